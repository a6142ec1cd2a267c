//! Execution context handles.

use crate::id::ContextId;
use std::sync::{Arc, OnceLock};

/// Opaque handle to a resolution environment.
///
/// The handle says nothing about what the environment resolves; whoever
/// built it (a plugin loader, a host) owns that meaning. Cloning is cheap
/// and clones compare equal, while two separately constructed contexts
/// never do, even when they share a name.
#[derive(Clone)]
pub struct ExecutionContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    id: ContextId,
    name: String,
}

static SYSTEM: OnceLock<ExecutionContext> = OnceLock::new();

impl ExecutionContext {
    /// Create a new, distinct context.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: ContextId::new(),
                name: name.into(),
            }),
        }
    }

    /// The process-wide default context.
    ///
    /// Every thread's ambient slot starts out holding this value.
    pub fn system() -> Self {
        SYSTEM.get_or_init(|| Self::new("system")).clone()
    }

    /// Get the context identifier.
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether this is the process-wide default context.
    pub fn is_system(&self) -> bool {
        *self == Self::system()
    }
}

impl PartialEq for ExecutionContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.id == other.inner.id
    }
}

impl Eq for ExecutionContext {}

impl std::hash::Hash for ExecutionContext {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExecutionContext({}#{})", self.inner.name, self.inner.id)
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.inner.name, self.inner.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let ctx = ExecutionContext::new("spark");
        let copy = ctx.clone();
        assert_eq!(ctx, copy);
        assert_eq!(ctx.id(), copy.id());
    }

    #[test]
    fn test_same_name_different_identity() {
        let a = ExecutionContext::new("spark");
        let b = ExecutionContext::new("spark");
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn test_system_is_singleton() {
        assert_eq!(ExecutionContext::system(), ExecutionContext::system());
        assert!(ExecutionContext::system().is_system());
        assert!(!ExecutionContext::new("system").is_system());
    }

    #[test]
    fn test_display_includes_name() {
        let ctx = ExecutionContext::new("python");
        assert!(ctx.to_string().starts_with("python#"));
    }
}
