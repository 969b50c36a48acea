/// Names of this many characters or fewer are rejected.
pub const MIN_NAME_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted(String),
    Rejected,
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }
}

pub trait PromptValidator: Send + Sync {
    fn validate(&self, text: &str) -> ValidationOutcome;
}

impl<F> PromptValidator for F
where
    F: Fn(&str) -> ValidationOutcome + Send + Sync,
{
    fn validate(&self, text: &str) -> ValidationOutcome {
        self(text)
    }
}

/// Accepts text longer than [`MIN_NAME_LENGTH`] characters and normalizes it
/// to upper case. Length is counted in chars, not bytes.
pub fn validate_name(text: &str) -> ValidationOutcome {
    match text.chars().count() > MIN_NAME_LENGTH {
        true => ValidationOutcome::Accepted(text.to_uppercase()),
        false => ValidationOutcome::Rejected,
    }
}
