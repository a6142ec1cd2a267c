//! Failure normalization.
//!
//! Every failure leaving a wrapper is an [`InterpretationFailure`]. Failures
//! that already are one pass through untouched; anything else is wrapped
//! once, keeping the original as the cause.

use crate::operation::Operation;
use sluice_core::{InterpretationFailure, InterpreterError};
use std::any::Any;

/// A backend panicked instead of returning.
#[derive(Debug, thiserror::Error)]
#[error("backend panicked: {message}")]
pub struct DelegatePanic {
    message: String,
}

impl DelegatePanic {
    /// Build from a panic payload as returned by `catch_unwind`.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        Self { message }
    }

    /// The panic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Map any backend failure to the recognized kind.
pub fn normalize(operation: Operation, err: InterpreterError) -> InterpretationFailure {
    match err {
        InterpreterError::Interpretation(failure) => failure,
        InterpreterError::Other(cause) => {
            tracing::debug!(%operation, error = %cause, "wrapping backend failure");
            InterpretationFailure::with_cause(format!("{operation} failed: {cause}"), cause)
        }
    }
}
