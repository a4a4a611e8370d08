use crate::document::Document;
use crate::events::{NoopVariableListener, SetOutcome, VariableListener};
use crate::types::{ScopeKey, VariableValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Registry entry for one scope. The parent is stored as a key, not a
/// reference, so removal is a plain map delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRecord {
    pub parent: Option<ScopeKey>,
}

/// Per-partition variable state: the scope registry, per-scope variable
/// maps, and the transitional per-scope payload slots.
///
/// All operations are synchronous and run inside a single-threaded,
/// strictly ordered processing stream — exactly one writer mutates a given
/// scope tree at a time, so the state carries no interior locking.
///
/// Variables and scope records are independent key spaces: local variable
/// operations never consult the registry, while hierarchical operations
/// treat a missing registry entry as a broken chain link and stop there.
pub struct VariablesState {
    scopes: BTreeMap<ScopeKey, ScopeRecord>,
    variables: BTreeMap<ScopeKey, BTreeMap<String, VariableValue>>,
    payloads: BTreeMap<ScopeKey, Document>,
    listener: Box<dyn VariableListener>,
}

impl Default for VariablesState {
    fn default() -> Self {
        Self::new()
    }
}

impl VariablesState {
    pub fn new() -> Self {
        Self {
            scopes: BTreeMap::new(),
            variables: BTreeMap::new(),
            payloads: BTreeMap::new(),
            listener: Box::new(NoopVariableListener),
        }
    }

    /// Replaces the single active listener. Events fire synchronously inside
    /// the triggering call; the listener must not re-enter the store.
    pub fn set_listener(&mut self, listener: Box<dyn VariableListener>) {
        self.listener = listener;
    }

    // ─── Scope registry ───────────────────────────────────────

    /// Registers `key` under `parent`. Keys must be fresh and parents must
    /// already be declared; violating either is a caller contract breach and
    /// fails fast.
    pub fn declare_scope(&mut self, parent: Option<ScopeKey>, key: ScopeKey) {
        assert!(
            !self.scopes.contains_key(&key),
            "scope {key} already declared"
        );
        if let Some(parent_key) = parent {
            assert!(
                self.scopes.contains_key(&parent_key),
                "parent scope {parent_key} of scope {key} not declared"
            );
        }
        self.scopes.insert(key, ScopeRecord { parent });
        debug!(scope = key, parent = ?parent, "declared scope");
    }

    /// Deletes the registry entry and the scope's local variables. Any later
    /// chain walk that needed to pass through `scope` terminates at the
    /// missing link, yielding only what was accumulated before the break.
    pub fn remove_scope(&mut self, scope: ScopeKey) {
        self.scopes.remove(&scope);
        self.variables.remove(&scope);
        debug!(scope, "removed scope");
    }

    // ─── Local variable operations ────────────────────────────

    /// Unconditional local write. Absent → create event, byte-different →
    /// update event, byte-identical → no-op without an event.
    pub fn set_variable_local(&mut self, scope: ScopeKey, name: &str, value: VariableValue) {
        self.set_variable(scope, scope, name, value);
    }

    /// Local lookup only; a name owned by an ancestor is not visible here.
    pub fn get_variable_local(&self, scope: ScopeKey, name: &str) -> Option<&VariableValue> {
        self.variables.get(&scope).and_then(|locals| locals.get(name))
    }

    /// The scope's own variables, name-ordered.
    pub fn get_variables_local_as_document(&self, scope: ScopeKey) -> Document {
        match self.variables.get(&scope) {
            Some(locals) => locals
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            None => Document::new(),
        }
    }

    /// Writes every field of `document`, in document order, as a local
    /// variable of `scope` — never to an ancestor.
    pub fn set_variables_local_from_document(&mut self, scope: ScopeKey, document: &Document) {
        for (name, value) in document.iter() {
            self.set_variable(scope, scope, name, value.clone());
        }
    }

    /// Deletes only the scope's local variables; ancestors are unaffected
    /// and no events fire.
    pub fn remove_all_variables(&mut self, scope: ScopeKey) {
        self.variables.remove(&scope);
    }

    // ─── Hierarchical operations ──────────────────────────────

    /// Folds the root→scope chain of local documents: a name redeclared
    /// closer to `scope` overwrites the ancestor's entry in place.
    pub fn get_variables_as_document(&self, scope: ScopeKey) -> Document {
        self.collect_chain_document(scope, None)
    }

    /// Same fold restricted to `names`: requested-but-absent names are
    /// silently omitted, unrequested names never appear.
    pub fn get_variables_as_document_filtered(
        &self,
        scope: ScopeKey,
        names: &[&str],
    ) -> Document {
        self.collect_chain_document(scope, Some(names))
    }

    /// Writes every field of `document`, in document order, into the
    /// ancestor chain of `scope`: a name already owned by some chain scope
    /// is overwritten there; a name owned nowhere is created at the topmost
    /// ancestor of that chain. Sibling and descendant scopes are never
    /// touched.
    pub fn set_variables_from_document(&mut self, scope: ScopeKey, document: &Document) {
        for (name, value) in document.iter() {
            let target = self.resolve_owning_scope(scope, name);
            self.set_variable(target, scope, name, value.clone());
        }
    }

    // ─── Payload slot ─────────────────────────────────────────

    /// Stores the scope's raw payload document, replacing any previous one.
    /// Payload keys are independent of variables and never resolved
    /// hierarchically.
    pub fn set_payload(&mut self, scope: ScopeKey, payload: Document) {
        self.payloads.insert(scope, payload);
    }

    pub fn get_payload(&self, scope: ScopeKey) -> Option<&Document> {
        self.payloads.get(&scope)
    }

    pub fn remove_payload(&mut self, scope: ScopeKey) {
        self.payloads.remove(&scope);
    }

    // ─── Internals ────────────────────────────────────────────

    /// Pure write decision: mutates `locals`, reports what happened. The
    /// caller dispatches the notification from the outcome.
    fn apply_local_write(
        locals: &mut BTreeMap<String, VariableValue>,
        name: &str,
        value: &VariableValue,
    ) -> SetOutcome {
        match locals.get_mut(name) {
            None => {
                locals.insert(name.to_owned(), value.clone());
                SetOutcome::Created
            }
            Some(existing) if existing == value => SetOutcome::Unchanged,
            Some(existing) => {
                *existing = value.clone();
                SetOutcome::Updated
            }
        }
    }

    fn set_variable(
        &mut self,
        scope: ScopeKey,
        root_scope: ScopeKey,
        name: &str,
        value: VariableValue,
    ) {
        let locals = self.variables.entry(scope).or_default();
        match Self::apply_local_write(locals, name, &value) {
            SetOutcome::Created => {
                trace!(scope, name, "created variable");
                self.listener.on_create(name, &value, scope, root_scope);
            }
            SetOutcome::Updated => {
                trace!(scope, name, "updated variable");
                self.listener.on_update(name, &value, scope, root_scope);
            }
            SetOutcome::Unchanged => {}
        }
    }

    fn parent_of(&self, scope: ScopeKey) -> Option<ScopeKey> {
        self.scopes.get(&scope).and_then(|record| record.parent)
    }

    /// Ancestor chain starting at `scope`, leaf first. A missing registry
    /// entry breaks the chain at that link.
    fn scope_chain(&self, scope: ScopeKey) -> Vec<ScopeKey> {
        let mut chain = vec![scope];
        let mut current = self.parent_of(scope);
        while let Some(key) = current {
            chain.push(key);
            current = self.parent_of(key);
        }
        chain
    }

    /// Nearest scope on the ancestor chain that already owns `name`, or the
    /// chain's topmost ancestor when no scope owns it. For a root scope both
    /// cases coincide at the scope itself.
    fn resolve_owning_scope(&self, scope: ScopeKey, name: &str) -> ScopeKey {
        let mut current = scope;
        loop {
            let owned = self
                .variables
                .get(&current)
                .is_some_and(|locals| locals.contains_key(name));
            if owned {
                return current;
            }
            match self.parent_of(current) {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    fn collect_chain_document(&self, scope: ScopeKey, filter: Option<&[&str]>) -> Document {
        let mut document = Document::new();
        for key in self.scope_chain(scope).iter().rev() {
            let Some(locals) = self.variables.get(key) else {
                continue;
            };
            for (name, value) in locals {
                if filter.is_some_and(|names| !names.contains(&name.as_str())) {
                    continue;
                }
                document.insert(name.clone(), value.clone());
            }
        }
        document
    }
}
