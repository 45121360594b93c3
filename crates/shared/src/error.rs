use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed notices the catalog view can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidSearchTerm,
    LoadFailed,
    SearchFailed,
    NoResults,
}

impl ErrorCode {
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidSearchTerm => "Please enter a valid search term.",
            Self::LoadFailed => "Error loading products.",
            Self::SearchFailed => "Error searching products.",
            Self::NoResults => "No products found.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct ViewError {
    pub code: ErrorCode,
    pub message: String,
}

impl ViewError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ErrorCode> for ViewError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code, code.message())
    }
}
