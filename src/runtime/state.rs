use parking_lot::RwLock;
use serde_json::{Map, Value};

/// Mutable page state for one renderer, seeded from the template's
/// `state.initial` block. Shared between the renderer and the action
/// dispatcher behind an `Arc`.
#[derive(Debug, Default)]
pub struct PageState {
    values: RwLock<Map<String, Value>>,
}

impl PageState {
    pub fn new(initial: Map<String, Value>) -> Self {
        Self {
            values: RwLock::new(initial),
        }
    }

    /// Copy of the current state object.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.values.read().clone()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    /// Shallow merge: each top-level key in `updates` replaces the existing
    /// entry wholesale, untouched keys survive. Nested objects are never
    /// merged recursively.
    pub fn apply_updates(&self, updates: &Map<String, Value>) {
        let mut values = self.values.write();
        for (key, value) in updates {
            values.insert(key.clone(), value.clone());
        }
    }
}
