use crate::fault::FaultKind;
use crate::shape::Shape;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Shared, clonable error object used for structured and custom errors.
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// Errors produced by the transformation operations and containers
#[non_exhaustive]
#[derive(Debug, Clone, Error)]
pub enum CollectionError {
    /// A callback panicked with a textual message
    #[error("{0}")]
    Panicked(String),

    /// A callback panicked with an error value as payload
    #[error(transparent)]
    Raised(SharedError),

    /// A callback panicked with a payload that is neither text nor an error
    #[error("Unknown panic")]
    UnknownPanic,

    /// A `map` callback changed its output shape after the first element
    #[error("callback produced {found} output at position {position}, but the result was committed to {expected}")]
    ShapeMismatch {
        position: usize,
        expected: Shape,
        found: Shape,
    },

    /// Building the result container itself failed
    #[error("failed to build result at position {position}: {reason}")]
    Construction { position: usize, reason: String },

    /// Error produced by a formatter registered with `with_error_message`
    #[error(transparent)]
    Custom(SharedError),

    /// The requested key was not found
    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

impl CollectionError {
    /// Where the fault came from, if this error was captured from a panicking callback
    pub fn kind(&self) -> Option<FaultKind> {
        match self {
            CollectionError::Panicked(_) => Some(FaultKind::Message),
            CollectionError::Raised(_) => Some(FaultKind::Structured),
            CollectionError::UnknownPanic => Some(FaultKind::Unknown),
            _ => None,
        }
    }

    pub fn is_callback_fault(&self) -> bool {
        self.kind().is_some()
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, CollectionError::ShapeMismatch { .. })
    }

    pub fn is_construction_fault(&self) -> bool {
        matches!(self, CollectionError::Construction { .. })
    }
}
