//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Cascade picker error type
///
/// The engine itself never fails on malformed indices or missing values; those
/// degrade to "no selection". Errors only come from collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CascadeError {
    /// The options loader failed for a column
    #[error("Failed to load options for column {column}: {message}")]
    Loader { column: usize, message: String },

    /// The options loader gave up waiting on its data source
    #[error("Loading options for column {column} timed out")]
    Timeout { column: usize },

    /// A host event was dispatched to a name nobody is bound to
    #[error("No handler bound under name: {0}")]
    HandlerNotBound(String),

    /// Options or state could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CascadeError {
    /// Build a loader error from anything displayable.
    pub fn loader(column: usize, message: impl Into<String>) -> Self {
        Self::Loader {
            column,
            message: message.into(),
        }
    }

    /// Whether re-invoking the loader with the same arguments may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Loader { .. } | Self::Timeout { .. })
    }

    /// Whether it is expected behavior, used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Loader { .. } | Self::Timeout { .. } | Self::HandlerNotBound(_) => true,
            Self::Serialization(_) => false,
        }
    }
}

impl From<serde_json::Error> for CascadeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Cascade picker Result type alias
pub type CascadeResult<T> = std::result::Result<T, CascadeError>;
