use serde::{Deserialize, Serialize};

use super::validator::{validate_name, PromptValidator, ValidationOutcome};
use super::OutgoingMessage;

pub const NAME_PROMPT: &str = "Please enter a name.";
pub const NAME_RETRY_PROMPT: &str =
    "A name must be more than three characters in length. Please try again.";
pub const NAME_CONFIRMATION: &str = "Thank you, I have your name as '{value}'.";

const VALUE_PLACEHOLDER: &str = "{value}";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    NoPrompt,
    AwaitingInput,
    Complete {
        value: String,
    },
}

/// Prompt progress of a single conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(flatten)]
    pub phase: Phase,
}

impl ConversationState {
    pub fn new(phase: Phase) -> Self {
        ConversationState { phase }
    }

    pub fn awaiting_input() -> Self {
        Self::new(Phase::AwaitingInput)
    }

    pub fn complete<V: Into<String>>(value: V) -> Self {
        Self::new(Phase::Complete {
            value: value.into(),
        })
    }

    /// Set only once the prompt cycle is complete.
    pub fn collected_value(&self) -> Option<&str> {
        match &self.phase {
            Phase::Complete { value } => Some(value),
            _ => None,
        }
    }
}

/// A single text prompt: what to ask, what to say on rejected input and how
/// to confirm an accepted value.
pub struct TextPrompt {
    prompt: String,
    retry_prompt: String,
    confirmation: String,
    validator: Box<dyn PromptValidator>,
}

impl TextPrompt {
    /// `confirmation` may contain `{value}`, which is replaced by the
    /// accepted value.
    pub fn new<V>(prompt: String, retry_prompt: String, confirmation: String, validator: V) -> Self
    where
        V: PromptValidator + 'static,
    {
        TextPrompt {
            prompt,
            retry_prompt,
            confirmation,
            validator: Box::new(validator),
        }
    }

    pub fn name_prompt() -> Self {
        Self::new(
            NAME_PROMPT.to_string(),
            NAME_RETRY_PROMPT.to_string(),
            NAME_CONFIRMATION.to_string(),
            validate_name,
        )
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn retry_prompt(&self) -> &str {
        &self.retry_prompt
    }

    pub fn confirmation_for(&self, value: &str) -> OutgoingMessage {
        self.confirmation.replace(VALUE_PLACEHOLDER, value).into()
    }

    /// Advances the prompt by one message turn.
    ///
    /// A completed cycle is reset and a new one starts in the same turn.
    /// A message without text is validated as an empty string.
    pub fn step(
        &self,
        state: ConversationState,
        text: Option<&str>,
    ) -> (ConversationState, OutgoingMessage) {
        match state.phase {
            Phase::NoPrompt | Phase::Complete { .. } => (
                ConversationState::awaiting_input(),
                self.prompt.as_str().into(),
            ),
            Phase::AwaitingInput => match self.validator.validate(text.unwrap_or_default()) {
                ValidationOutcome::Accepted(value) => {
                    let reply = self.confirmation_for(&value);
                    (ConversationState::complete(value), reply)
                }
                ValidationOutcome::Rejected => (
                    ConversationState::awaiting_input(),
                    self.retry_prompt.as_str().into(),
                ),
            },
        }
    }
}

impl std::fmt::Debug for TextPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPrompt")
            .field("prompt", &self.prompt)
            .field("retry_prompt", &self.retry_prompt)
            .field("confirmation", &self.confirmation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::dialogues::validator::ValidationOutcome;

    use super::{ConversationState, Phase, TextPrompt, NAME_PROMPT, NAME_RETRY_PROMPT};

    #[test]
    fn test_first_message_issues_prompt() {
        let prompt = TextPrompt::name_prompt();

        let (state, reply) = prompt.step(ConversationState::default(), Some("hi"));

        assert_eq!(state.phase, Phase::AwaitingInput);
        assert_eq!(reply.text(), "Please enter a name.");
        assert_eq!(state.collected_value(), None);
    }

    #[test]
    fn test_short_name_retried() {
        let prompt = TextPrompt::name_prompt();

        let (state, reply) = prompt.step(ConversationState::awaiting_input(), Some("Al"));

        assert_eq!(state, ConversationState::awaiting_input());
        assert_eq!(
            reply.text(),
            "A name must be more than three characters in length. Please try again."
        );
    }

    #[test]
    fn test_missing_text_retried() {
        let prompt = TextPrompt::name_prompt();

        let (state, reply) = prompt.step(ConversationState::awaiting_input(), None);

        assert_eq!(state, ConversationState::awaiting_input());
        assert_eq!(reply.text(), NAME_RETRY_PROMPT);
    }

    #[test]
    fn test_name_accepted() {
        let prompt = TextPrompt::name_prompt();

        let (state, reply) = prompt.step(ConversationState::awaiting_input(), Some("Alice"));

        assert_eq!(state, ConversationState::complete("ALICE"));
        assert_eq!(state.collected_value(), Some("ALICE"));
        assert_eq!(reply.text(), "Thank you, I have your name as 'ALICE'.");
    }

    #[test]
    fn test_completed_cycle_restarts() {
        let prompt = TextPrompt::name_prompt();

        let (state, reply) = prompt.step(ConversationState::complete("ALICE"), Some("again"));

        assert_eq!(state.phase, Phase::AwaitingInput);
        assert_eq!(state.collected_value(), None);
        assert_eq!(reply.text(), NAME_PROMPT);
    }

    #[test]
    fn test_custom_prompt() {
        let prompt = TextPrompt::new(
            "Age?".to_string(),
            "Digits only".to_string(),
            "Age {value} saved".to_string(),
            |text: &str| match text.parse::<u8>() {
                Ok(age) => ValidationOutcome::Accepted(age.to_string()),
                Err(_) => ValidationOutcome::Rejected,
            },
        );

        let (state, reply) = prompt.step(ConversationState::awaiting_input(), Some("x"));
        assert_eq!(reply.text(), "Digits only");

        let (state, reply) = prompt.step(state, Some("042"));
        assert_eq!(reply.text(), "Age 42 saved");
        assert_eq!(state.collected_value(), Some("42"));
    }

    #[test]
    fn test_state_serialization_format() {
        let json = serde_json::to_string(&ConversationState::complete("ALICE")).unwrap();
        assert_eq!(json, r#"{"phase":"complete","value":"ALICE"}"#);

        let state: ConversationState =
            serde_json::from_str(r#"{"phase":"awaiting_input"}"#).unwrap();
        assert_eq!(state, ConversationState::awaiting_input());
    }
}
