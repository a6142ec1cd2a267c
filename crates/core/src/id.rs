//! Unique identifiers for sluice entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for an ExecutionContext
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(Ulid);

impl ContextId {
    /// Generate a new ContextId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an InterpreterGroup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(Ulid);

impl GroupId {
    /// Generate a new GroupId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_id_displays_as_ulid() {
        let id = ContextId::new();
        assert_eq!(id.to_string(), id.0.to_string());
        assert_eq!(id.to_string().len(), 26);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(GroupId::new(), GroupId::new());
        assert_ne!(ContextId::new(), ContextId::new());
    }
}
