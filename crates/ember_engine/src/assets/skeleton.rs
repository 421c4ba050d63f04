//! Bone name table and hierarchy binding

use std::collections::HashMap;

use crate::ecs::{GameObjectId, World};

/// Stable mapping between bone names and palette indices
///
/// Indices are handed out in first-seen order and never change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneTable {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl BoneTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with `names` at indices `0..names.len()`; repeated names keep
    /// their first index
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for name in names {
            table.get_or_insert(name.as_ref());
        }
        table
    }

    /// Index of `name`, assigning the next free one if it is new
    pub fn get_or_insert(&mut self, name: &str) -> usize {
        if let Some(index) = self.indices.get(name) {
            return *index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.indices.insert(name.to_string(), index);
        index
    }

    /// Index of `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Name at `index`
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of bones
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Match bone names against the game objects below `root` (inclusive)
    ///
    /// Returns bone index to game object, suitable for
    /// [`Animator::set_bindings`](crate::animation::Animator::set_bindings).
    /// The first object with a given name wins; bones with no matching object
    /// are logged and left unbound.
    pub fn bind_hierarchy(&self, world: &World, root: GameObjectId) -> HashMap<usize, GameObjectId> {
        let mut bindings = HashMap::new();
        for id in world.subtree(root) {
            let Some(object) = world.get(id) else {
                continue;
            };
            if let Some(index) = self.index_of(object.name()) {
                bindings.entry(index).or_insert(id);
            }
        }
        for (index, name) in self.names.iter().enumerate() {
            if !bindings.contains_key(&index) {
                log::warn!("Bone '{name}' has no matching game object");
            }
        }
        bindings
    }
}
