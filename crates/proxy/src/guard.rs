//! Context switch guard.

use sluice_core::{AmbientContext, ExecutionContext};

/// Scoped replacement of the ambient context.
///
/// The caller's context is put back when the guard is restored or dropped,
/// whichever comes first, including while unwinding.
#[must_use = "dropping the guard restores the previous context immediately"]
pub struct ContextSwitch<'a, A: AmbientContext + ?Sized> {
    ambient: &'a A,
    previous: Option<ExecutionContext>,
}

impl<'a, A: AmbientContext + ?Sized> ContextSwitch<'a, A> {
    /// Install `context` as the ambient context.
    pub fn install(ambient: &'a A, context: ExecutionContext) -> Self {
        tracing::trace!(installed = %context, "installing context");
        let previous = ambient.install(context);
        Self {
            ambient,
            previous: Some(previous),
        }
    }

    /// The context that was ambient before installation.
    pub fn previous(&self) -> Option<&ExecutionContext> {
        self.previous.as_ref()
    }

    /// The ambient facility this guard operates on.
    pub fn ambient(&self) -> &'a A {
        self.ambient
    }

    /// Put the caller's context back.
    ///
    /// Returns the context that was ambient right before restoration.
    pub fn restore(mut self) -> ExecutionContext {
        self.restore_previous()
            .unwrap_or_else(|| self.ambient.current())
    }

    fn restore_previous(&mut self) -> Option<ExecutionContext> {
        let previous = self.previous.take()?;
        tracing::trace!(restored = %previous, "restoring context");
        Some(self.ambient.install(previous))
    }
}

impl<A: AmbientContext + ?Sized> Drop for ContextSwitch<'_, A> {
    fn drop(&mut self) {
        self.restore_previous();
    }
}
