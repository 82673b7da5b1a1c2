use std::path::PathBuf;
use thiserror::Error;

/// A pattern that failed to compile into a regular expression
///
/// Raised both for individual regex rules and for the composite highlight
/// pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Regex error in '{pattern}': {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

impl PatternError {
    pub fn new(pattern: impl Into<String>, err: &regex::Error) -> Self {
        let message = match err {
            regex::Error::Syntax(msg) => msg
                .lines()
                .last()
                .unwrap_or(msg.as_str())
                .trim_start_matches("error: ")
                .to_string(),
            other => other.to_string(),
        };
        Self {
            pattern: pattern.into(),
            message,
        }
    }
}

/// Failure to read a document from its source
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
