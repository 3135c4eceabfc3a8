//! The persistent execution environment of one document session.

use ecow::EcoString;
use hashbrown::HashMap;

use crate::values::Value;

/// A single mutable namespace, seeded with `__name__ = "__main__"`.
///
/// One environment exists per document session; it survives across
/// evaluation passes so earlier statements' bindings stay visible, and is
/// only replaced on explicit reset.
#[derive(Debug, Clone)]
pub struct Environment {
    bindings: HashMap<EcoString, Value>,
}

impl Environment {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(EcoString::from("__name__"), Value::str("__main__"));
        Self { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings.get_mut(name)
    }

    pub fn set(&mut self, name: impl Into<EcoString>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
