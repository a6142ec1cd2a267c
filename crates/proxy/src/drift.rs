//! Context drift tracking.

use parking_lot::Mutex;
use sluice_core::ExecutionContext;

/// Outcome of one drift capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    /// The backend left the context it was given in place.
    Unchanged,
    /// The backend switched contexts and did not switch back.
    Moved {
        /// Context installed for the call
        from: ExecutionContext,
        /// Context observed when the call finished
        to: ExecutionContext,
    },
}

impl Drift {
    /// Whether the stored context changed.
    pub fn is_moved(&self) -> bool {
        matches!(self, Drift::Moved { .. })
    }
}

/// The live context a wrapper installs on its next call.
///
/// The lock is held only while reading or replacing the value, never
/// across a backend call.
#[derive(Debug)]
pub struct DriftSlot {
    stored: Mutex<ExecutionContext>,
}

impl DriftSlot {
    /// Create a slot holding `initial`.
    pub fn new(initial: ExecutionContext) -> Self {
        Self {
            stored: Mutex::new(initial),
        }
    }

    /// The currently stored context.
    pub fn snapshot(&self) -> ExecutionContext {
        self.stored.lock().clone()
    }

    /// Persist `observed` as the stored context.
    pub fn capture(&self, observed: ExecutionContext) -> Drift {
        let previous = std::mem::replace(&mut *self.stored.lock(), observed.clone());
        if previous == observed {
            Drift::Unchanged
        } else {
            Drift::Moved {
                from: previous,
                to: observed,
            }
        }
    }
}
