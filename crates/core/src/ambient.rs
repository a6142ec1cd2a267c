//! The ambient context facility.
//!
//! An ambient context is whatever resolution environment is implicitly
//! associated with the running thread. Wrappers read and temporarily
//! overwrite it; backends may change it and leave it changed.

use crate::context::ExecutionContext;
use std::cell::RefCell;

/// Host-provided get/set access to the ambient context.
pub trait AmbientContext: Send + Sync {
    /// Read the ambient context of the calling thread or task.
    fn current(&self) -> ExecutionContext;

    /// Replace the ambient context, returning the value it displaced.
    fn install(&self, context: ExecutionContext) -> ExecutionContext;
}

thread_local! {
    static AMBIENT: RefCell<Option<ExecutionContext>> = const { RefCell::new(None) };
}

/// Ambient context bound to the current OS thread.
///
/// The slot is not carried across `.await` points or into spawned threads.
/// A fresh thread observes [`ExecutionContext::system`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadAmbient;

impl AmbientContext for ThreadAmbient {
    fn current(&self) -> ExecutionContext {
        AMBIENT.with(|slot| {
            slot.borrow_mut()
                .get_or_insert_with(ExecutionContext::system)
                .clone()
        })
    }

    fn install(&self, context: ExecutionContext) -> ExecutionContext {
        AMBIENT.with(|slot| {
            slot.borrow_mut()
                .replace(context)
                .unwrap_or_else(ExecutionContext::system)
        })
    }
}

/// Read this thread's ambient context.
pub fn current_ambient() -> ExecutionContext {
    ThreadAmbient.current()
}

/// Replace this thread's ambient context, returning the previous one.
pub fn install_ambient(context: ExecutionContext) -> ExecutionContext {
    ThreadAmbient.install(context)
}
