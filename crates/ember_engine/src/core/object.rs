//! Identity and lifecycle base shared by every engine entity
//!
//! Scenes, game objects and components each carry an [`Object`]: a
//! process-unique instance id, a display name and an active flag. Ids come
//! from a global monotonic counter and are never reused, even after the entity
//! that held one is destroyed.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of an engine entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity and active state of an engine entity
///
/// Deliberately not `Clone`: copying an entity must mint a new identity, which
/// is what [`Object::duplicate`] does.
#[derive(Debug)]
pub struct Object {
    id: InstanceId,
    name: String,
    active: bool,
}

impl Object {
    /// Create an active object with a fresh instance id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: InstanceId::next(),
            name: name.into(),
            active: true,
        }
    }

    /// Copy name and active state under a fresh instance id
    pub fn duplicate(&self) -> Self {
        Self {
            id: InstanceId::next(),
            name: self.name.clone(),
            active: self.active,
        }
    }

    /// Instance id assigned at construction
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the object
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether traversals should update and render this object
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set the active flag, returning true if it changed
    pub fn set_active(&mut self, active: bool) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let a = Object::new("a");
        let b = Object::new("b");
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_duplicate_mints_new_id() {
        let mut original = Object::new("enemy");
        original.set_active(false);
        let copy = original.duplicate();

        assert_ne!(copy.id(), original.id());
        assert_eq!(copy.name(), "enemy");
        assert!(!copy.is_active());
    }

    #[test]
    fn test_set_active_reports_change() {
        let mut object = Object::new("toggle");
        assert!(!object.set_active(true));
        assert!(object.set_active(false));
        assert!(!object.is_active());
    }
}
