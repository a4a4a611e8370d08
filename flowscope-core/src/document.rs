use crate::types::VariableValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered name→value projection materialized from one or more scopes.
///
/// Field order is insertion order. Re-inserting an existing name replaces
/// the value but keeps the original position — the hierarchical fold relies
/// on this: an entry contributed by an ancestor keeps its slot when a
/// descendant shadows it. Building from pairs resolves duplicate names
/// last-occurrence-wins.
///
/// Documents are transient: they are materialized on demand and never
/// persisted as such. Encoding to/from the wire format is the job of the
/// external serialization codec.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: IndexMap<String, VariableValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Inserts a field. An existing name keeps its position; only the value
    /// is replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: VariableValue) {
        self.entries.insert(name.into(), value);
    }

    /// Fields in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, VariableValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, VariableValue)>>(iter: I) -> Self {
        let mut document = Document::new();
        for (name, value) in iter {
            document.insert(name, value);
        }
        document
    }
}
