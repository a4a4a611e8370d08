//! # Flowscope — variable-scope substrate for a process engine
//!
//! For every running process instance this crate tracks a tree of nested
//! variable scopes and propagates data between execution steps via
//! declarative mappings:
//!
//! - [`VariablesState`] — the scope registry and per-scope variable store
//!   with shadowed lookup, hierarchical document projection, removal, and
//!   change notification through a single [`VariableListener`].
//! - [`IoMappingHelper`] — the input/output mapping stage moving data
//!   between a step and its enclosing flow scope at step entry and exit,
//!   via the opaque [`MergeTool`] primitive.
//! - A transitional per-scope payload slot bridging consumers not yet
//!   migrated off the single-document field.
//!
//! Values are opaque serialized bytes; the store only compares them for
//! exact byte equality. Documents ([`Document`]) are ordered name→value
//! projections materialized on demand. All operations are synchronous and
//! single-writer: the embedding engine runs them inside one strictly
//! ordered processing stream per partition.
//!
//! ```
//! use flowscope_core::{Document, VariablesState};
//!
//! let mut state = VariablesState::new();
//! state.declare_scope(None, 1);
//! state.declare_scope(Some(1), 2);
//!
//! state.set_variable_local(1, "order_id", b"4711".to_vec());
//! state.set_variable_local(2, "attempt", b"1".to_vec());
//!
//! // the child sees its own variables plus the parent's
//! let document: Document = state.get_variables_as_document(2);
//! assert_eq!(document.get("order_id"), Some(&b"4711".to_vec()));
//! assert_eq!(document.get("attempt"), Some(&b"1".to_vec()));
//! ```

pub mod document;
pub mod events;
pub mod io_mapping;
pub mod merge;
pub mod types;
pub mod variables;

pub use document::Document;
pub use events::{NoopVariableListener, SetOutcome, VariableListener};
pub use io_mapping::{FlowElement, IoMappingHelper, MappingError, StepContext, StepRecord};
pub use merge::{ConflictError, MergeTool};
pub use types::{Mapping, OutputBehavior, ScopeKey, VariableValue};
pub use variables::{ScopeRecord, VariablesState};
