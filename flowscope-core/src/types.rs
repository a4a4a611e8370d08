use serde::{Deserialize, Serialize};

// ─── Scalar aliases ───────────────────────────────────────────

/// Scope identifier — one per element instance, assigned by the
/// element-instance lifecycle.
pub type ScopeKey = i64;

/// Serialized variable value. Opaque to the store; the only operation ever
/// performed on it here is exact byte comparison.
pub type VariableValue = Vec<u8>;

// ─── Mappings ─────────────────────────────────────────────────

/// One declared input/output mapping: move the value selected by `source`
/// to `target`. Both sides are path expressions owned by the compiled
/// process model; this crate never interprets the syntax.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub source: String,
    pub target: String,
}

impl Mapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

// ─── Output behavior ──────────────────────────────────────────

/// Whether a step's output mappings are merged into the parent flow scope
/// on completion. `None` suppresses the merge even when mappings exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputBehavior {
    #[default]
    Merge,
    None,
}
