use std::path::PathBuf;

use thiserror::Error;

pub const STATE_DIR_VAR: &str = "PROMPT_BOT_STATE_DIR";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";
const DEFAULT_LOG_FILTER: &str = "DEBUG";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is set but empty")]
    EmptyVar(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Conversation states are kept in memory when unset.
    pub state_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let state_dir = match var(STATE_DIR_VAR) {
            Some(dir) if dir.trim().is_empty() => return Err(ConfigError::EmptyVar(STATE_DIR_VAR)),
            Some(dir) => Some(PathBuf::from(dir.trim())),
            None => None,
        };

        Ok(BotConfig {
            state_dir,
            log_filter: var(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::{BotConfig, ConfigError, STATE_DIR_VAR};

    fn config(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.state_dir, None);
        assert_eq!(config.log_filter, "DEBUG");
    }

    #[test]
    fn test_state_dir_and_log_filter() {
        let config = config(&[
            ("PROMPT_BOT_STATE_DIR", " /var/lib/prompt-bot "),
            ("RUST_LOG", "info,bot=debug"),
        ])
        .unwrap();

        assert_eq!(config.state_dir, Some(PathBuf::from("/var/lib/prompt-bot")));
        assert_eq!(config.log_filter, "info,bot=debug");
    }

    #[test]
    fn test_empty_state_dir() {
        assert_eq!(
            config(&[("PROMPT_BOT_STATE_DIR", "  ")]),
            Err(ConfigError::EmptyVar(STATE_DIR_VAR))
        );
    }
}
