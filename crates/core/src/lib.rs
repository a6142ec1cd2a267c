//! sluice core data model.
//!
//! This crate defines the interpreter capability set, the execution context
//! handle, the ambient context facility and the failure taxonomy shared by
//! backends and the wrappers placed in front of them.

#![warn(missing_docs)]

// Identities
mod id;

// Resolution environments
mod ambient;
mod context;

// Capability set
mod error;
mod interpreter;

// Re-exports
pub use id::*;

pub use ambient::{current_ambient, install_ambient, AmbientContext, ThreadAmbient};
pub use context::ExecutionContext;

pub use error::{BoxError, FailureKind, InterpretationFailure, InterpreterError, Result};
pub use interpreter::{
    innermost, FormType, Interpreter, InterpreterGroup, InterpreterResult, InvocationContext,
    OutputKind, Properties, ResourceUrl, ResultCode, SchedulerHandle, SchedulerKind,
    WrappedInterpreter,
};
