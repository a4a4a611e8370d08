use crate::types::ScopeKey;

/// Outcome of a single local variable write. The decision is made on exact
/// byte equality of the serialized value and dispatched once to the
/// listener; `Unchanged` fires nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Observer for variable creates and updates, consumed by the export/audit
/// pipeline.
///
/// Callbacks fire synchronously inside the triggering store call, in
/// document field order. `variable_scope_key` is the scope that owns the
/// value after the write; `root_scope_key` is the scope the triggering call
/// addressed — equal to `variable_scope_key` for local operations, while a
/// hierarchical write may land on an ancestor of the addressed scope.
/// Listeners must not re-enter the store.
pub trait VariableListener {
    fn on_create(
        &mut self,
        name: &str,
        value: &[u8],
        variable_scope_key: ScopeKey,
        root_scope_key: ScopeKey,
    );

    fn on_update(
        &mut self,
        name: &str,
        value: &[u8],
        variable_scope_key: ScopeKey,
        root_scope_key: ScopeKey,
    );
}

/// Default listener: drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopVariableListener;

impl VariableListener for NoopVariableListener {
    fn on_create(&mut self, _name: &str, _value: &[u8], _variable: ScopeKey, _root: ScopeKey) {}

    fn on_update(&mut self, _name: &str, _value: &[u8], _variable: ScopeKey, _root: ScopeKey) {}
}
