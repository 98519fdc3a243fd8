//! Error types for deck-core.

use thiserror::Error;

/// Result type alias using LoadError.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while loading the word data feed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch failed for {resource}: {message}")]
    Fetch { resource: String, message: String },

    #[error("unparsable {resource}: {message}")]
    Parse { resource: String, message: String },
}

impl LoadError {
    pub fn fetch(resource: &str, message: impl ToString) -> Self {
        Self::Fetch {
            resource: resource.to_string(),
            message: message.to_string(),
        }
    }

    pub fn parse(resource: &str, message: impl ToString) -> Self {
        Self::Parse {
            resource: resource.to_string(),
            message: message.to_string(),
        }
    }
}
