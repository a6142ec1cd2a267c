//! The context-scoped interpreter proxy.
//!
//! Every call follows the same protocol:
//! ```text
//! install stored → call backend → capture ambient as stored → restore caller's
//! ```
//! Capture and restore run on every exit path, including backend failures
//! and panics.

use crate::config::ProxyConfig;
use crate::drift::{Drift, DriftSlot};
use crate::guard::ContextSwitch;
use crate::normalize::{normalize, DelegatePanic};
use crate::operation::Operation;
use sluice_core::{
    AmbientContext, ExecutionContext, FormType, Interpreter, InterpreterError, InterpreterGroup,
    InterpreterResult, InvocationContext, Properties, ResourceUrl, Result, SchedulerHandle,
    ThreadAmbient, WrappedInterpreter,
};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace, warn};

/// Runs a backend inside its own execution context.
///
/// The proxy owns one backend for its whole life and remembers the context
/// to install for it. When the backend switches contexts and leaves the
/// switch in place, the proxy keeps the new context for its next call while
/// the caller never sees it.
///
/// The stored context is locked only to read it at installation and to
/// replace it at capture, so `cancel` and `progress` from another thread
/// reach the backend while an `interpret` is still running. When calls
/// overlap, the call that finishes last decides the stored context. Hosts
/// that need a deterministic drift chain run one call at a time per proxy.
pub struct ContextScopedInterpreter<D, A = ThreadAmbient> {
    delegate: D,
    ambient: A,
    slot: DriftSlot,
    config: ProxyConfig,
}

impl<D: Interpreter> ContextScopedInterpreter<D> {
    /// Wrap `delegate` so it runs in `context` on the calling thread.
    pub fn new(delegate: D, context: ExecutionContext) -> Self {
        Self::with_ambient(delegate, context, ThreadAmbient)
    }
}

impl<D: Interpreter, A: AmbientContext> ContextScopedInterpreter<D, A> {
    /// Wrap `delegate` using a host-provided ambient facility.
    pub fn with_ambient(delegate: D, context: ExecutionContext, ambient: A) -> Self {
        Self {
            delegate,
            ambient,
            slot: DriftSlot::new(context),
            config: ProxyConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ProxyConfig) -> Self {
        self.config = config;
        self
    }

    /// The context the next call will install.
    pub fn stored_context(&self) -> ExecutionContext {
        self.slot.snapshot()
    }

    /// The wrapped backend.
    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// The ambient facility.
    pub fn ambient(&self) -> &A {
        &self.ambient
    }

    /// The configuration.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    fn invoke<T>(&self, operation: Operation, call: impl FnOnce(&D) -> Result<T>) -> Result<T> {
        let span = tracing::trace_span!(
            "interpreter_call",
            %operation,
            proxy = self.config.label.as_deref().unwrap_or_default(),
        );
        let _entered = span.enter();

        let outcome = {
            let _scope = CallScope::enter(&self.ambient, &self.slot);
            self.run(operation, call)
        };

        outcome.map_err(|err| InterpreterError::Interpretation(normalize(operation, err)))
    }

    fn run<T>(&self, operation: Operation, call: impl FnOnce(&D) -> Result<T>) -> Result<T> {
        if !self.config.catch_panics {
            return call(&self.delegate);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| call(&self.delegate))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let panic = DelegatePanic::from_payload(payload);
                warn!(%operation, message = panic.message(), "backend panicked");
                Err(InterpreterError::other(panic))
            }
        }
    }
}

/// One call's context span.
///
/// `Drop::drop` captures drift; the `switch` field is dropped after it and
/// restores the caller's context.
struct CallScope<'a, A: AmbientContext> {
    slot: &'a DriftSlot,
    switch: ContextSwitch<'a, A>,
}

impl<'a, A: AmbientContext> CallScope<'a, A> {
    fn enter(ambient: &'a A, slot: &'a DriftSlot) -> Self {
        let switch = ContextSwitch::install(ambient, slot.snapshot());
        Self { slot, switch }
    }
}

impl<A: AmbientContext> Drop for CallScope<'_, A> {
    fn drop(&mut self) {
        let observed = self.switch.ambient().current();
        match self.slot.capture(observed) {
            Drift::Unchanged => trace!("stored context unchanged"),
            Drift::Moved { from, to } => debug!(%from, %to, "stored context drifted"),
        }
    }
}

impl<D: Interpreter, A: AmbientContext> Interpreter for ContextScopedInterpreter<D, A> {
    fn open(&self) -> Result<()> {
        self.invoke(Operation::Open, |d| d.open())
    }

    fn close(&self) -> Result<()> {
        self.invoke(Operation::Close, |d| d.close())
    }

    fn interpret(&self, code: &str, context: &InvocationContext) -> Result<InterpreterResult> {
        self.invoke(Operation::Interpret, |d| d.interpret(code, context))
    }

    fn cancel(&self, context: &InvocationContext) -> Result<()> {
        self.invoke(Operation::Cancel, |d| d.cancel(context))
    }

    fn form_type(&self) -> Result<FormType> {
        self.invoke(Operation::FormType, |d| d.form_type())
    }

    fn progress(&self, context: &InvocationContext) -> Result<u8> {
        self.invoke(Operation::Progress, |d| d.progress(context))
    }

    fn scheduler(&self) -> Result<SchedulerHandle> {
        self.invoke(Operation::Scheduler, |d| d.scheduler())
    }

    fn completion(&self, buffer: &str, cursor: usize) -> Result<Vec<String>> {
        self.invoke(Operation::Completion, |d| d.completion(buffer, cursor))
    }

    fn class_name(&self) -> Result<String> {
        self.invoke(Operation::ClassName, |d| d.class_name())
    }

    fn set_group(&self, group: InterpreterGroup) -> Result<()> {
        self.invoke(Operation::SetGroup, move |d| d.set_group(group))
    }

    fn group(&self) -> Result<Option<InterpreterGroup>> {
        self.invoke(Operation::Group, |d| d.group())
    }

    fn set_context_resources(&self, resources: Vec<ResourceUrl>) -> Result<()> {
        self.invoke(Operation::SetContextResources, move |d| {
            d.set_context_resources(resources)
        })
    }

    fn context_resources(&self) -> Result<Vec<ResourceUrl>> {
        self.invoke(Operation::ContextResources, |d| d.context_resources())
    }

    fn set_properties(&self, properties: Properties) -> Result<()> {
        self.invoke(Operation::SetProperties, move |d| d.set_properties(properties))
    }

    fn properties(&self) -> Result<Properties> {
        self.invoke(Operation::Properties, |d| d.properties())
    }

    fn property(&self, key: &str) -> Result<Option<String>> {
        self.invoke(Operation::Property, |d| d.property(key))
    }

    fn as_wrapped(&self) -> Option<&dyn WrappedInterpreter> {
        Some(self)
    }
}

impl<D: Interpreter, A: AmbientContext> WrappedInterpreter for ContextScopedInterpreter<D, A> {
    fn inner_interpreter(&self) -> &dyn Interpreter {
        &self.delegate
    }
}
