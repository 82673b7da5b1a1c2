use thiserror::Error;

/// Errors raised when editing a rule set
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Rule limit reached: at most {max} rules")]
    CapacityExceeded { max: usize },

    #[error("No rule at position {index} (rule count is {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors that can occur when parsing a rule term
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleParseError {
    #[error(
        "Unknown rule kind: '{0}'. Valid kinds are: include (i), exclude (x), starts_with (s), ends_with (e), regex (r)"
    )]
    UnknownKind(String),

    #[error("Unknown rule modifier: '{0}'. The only modifier is '/c' (case-sensitive)")]
    UnknownModifier(String),

    #[error("Empty pattern for rule kind '{0}'")]
    EmptyPattern(String),

    #[error("Invalid rule term: {0}")]
    InvalidTerm(String),
}
