//! Context-scoped interpreter proxy.
//!
//! Wraps any [`Interpreter`](sluice_core::Interpreter) so each call runs
//! with the backend's own execution context installed, keeps whatever
//! context the backend switched to for the next call, and hands the caller
//! back its original context and only recognized failures.

#![warn(missing_docs)]

pub mod config;
pub mod drift;
pub mod guard;
pub mod normalize;
pub mod operation;
pub mod proxy;

pub use config::{ConfigError, ProxyConfig};
pub use drift::{Drift, DriftSlot};
pub use guard::ContextSwitch;
pub use normalize::{normalize, DelegatePanic};
pub use operation::Operation;
pub use proxy::ContextScopedInterpreter;
