//! Failure taxonomy for interpreter calls.

use std::error::Error as StdError;

/// Boxed error from a backend that does not speak [`InterpretationFailure`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for interpreter operations.
pub type Result<T> = std::result::Result<T, InterpreterError>;

/// The recognized failure kind.
///
/// Wrappers guarantee this is the only kind that leaves them. Whatever the
/// backend originally raised stays reachable through [`source`](StdError::source).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct InterpretationFailure {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl InterpretationFailure {
    /// Create a failure with no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a failure caused by another error.
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Get the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the direct cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Take the direct cause out of the failure.
    pub fn into_cause(self) -> Option<BoxError> {
        self.cause
    }
}

/// Which normalization branch a failure takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Already an [`InterpretationFailure`]; propagated as is.
    Recognized,
    /// Anything else; wrapped before it propagates.
    Unrecognized,
}

/// Error returned by [`Interpreter`](crate::Interpreter) operations.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// Recognized failure
    #[error(transparent)]
    Interpretation(#[from] InterpretationFailure),

    /// Any other backend failure
    #[error("{0}")]
    Other(#[source] BoxError),
}

impl InterpreterError {
    /// Wrap an arbitrary backend error.
    pub fn other(err: impl Into<BoxError>) -> Self {
        InterpreterError::Other(err.into())
    }

    /// Classify this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            InterpreterError::Interpretation(_) => FailureKind::Recognized,
            InterpreterError::Other(_) => FailureKind::Unrecognized,
        }
    }

    /// Get the recognized failure, if this is one.
    pub fn as_interpretation(&self) -> Option<&InterpretationFailure> {
        match self {
            InterpreterError::Interpretation(failure) => Some(failure),
            InterpreterError::Other(_) => None,
        }
    }
}

impl From<anyhow::Error> for InterpreterError {
    fn from(err: anyhow::Error) -> Self {
        InterpreterError::Other(err.into())
    }
}

impl From<std::io::Error> for InterpreterError {
    fn from(err: std::io::Error) -> Self {
        InterpreterError::Other(Box::new(err))
    }
}
