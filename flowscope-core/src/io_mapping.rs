use crate::document::Document;
use crate::merge::{ConflictError, MergeTool};
use crate::types::{Mapping, OutputBehavior, ScopeKey};
use crate::variables::VariablesState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Compiled element view consumed by the mapping stage. Mapping lists and
/// the output behavior come from the compiled process model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowElement {
    pub input_mappings: Vec<Mapping>,
    pub output_mappings: Vec<Mapping>,
    pub output_behavior: OutputBehavior,
}

/// The step's instance record. `payload` is the transitional single-document
/// field still read by record consumers; the mapping stage only ever writes
/// it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub payload: Document,
}

/// Everything the mapping stage needs about one step boundary.
pub struct StepContext<'a> {
    pub variables: &'a mut VariablesState,
    pub merge_tool: &'a mut dyn MergeTool,
    pub element: &'a FlowElement,
    /// Scope owned by the step itself.
    pub element_instance_key: ScopeKey,
    /// Nearest enclosing flow scope; `None` for the process instance
    /// element.
    pub flow_scope_key: Option<ScopeKey>,
    pub record: &'a mut StepRecord,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Data extraction failed; surfaced unchanged from the merge primitive.
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    /// Mappings were declared on a step with no enclosing flow scope.
    #[error("element instance {0} declares mappings but has no flow scope")]
    MissingFlowScope(ScopeKey),
}

/// Applies declared input/output mappings at step boundaries.
///
/// Input mapping runs strictly before the step body, output mapping
/// strictly after it and before the completion becomes externally
/// observable; the embedding engine guarantees that ordering. A failed
/// merge leaves the variable store without any of the merge's output.
#[derive(Clone, Copy, Debug, Default)]
pub struct IoMappingHelper;

impl IoMappingHelper {
    /// Projects the flow scope's full visible document, merges it through
    /// the declared input mappings, and writes the result as local
    /// variables of the step's own scope. The result is mirrored into the
    /// step record's legacy payload field. No-op when the element declares
    /// no input mappings.
    pub fn apply_input_mappings(&self, ctx: &mut StepContext<'_>) -> Result<(), MappingError> {
        let mappings = &ctx.element.input_mappings;
        if mappings.is_empty() {
            return Ok(());
        }
        let flow_scope = ctx
            .flow_scope_key
            .ok_or(MappingError::MissingFlowScope(ctx.element_instance_key))?;

        let scope_variables = ctx.variables.get_variables_as_document(flow_scope);
        let mapped = ctx.merge_tool.merge(&scope_variables, mappings)?;

        ctx.variables
            .set_variables_local_from_document(ctx.element_instance_key, &mapped);
        debug!(
            element_instance = ctx.element_instance_key,
            flow_scope,
            mappings = mappings.len(),
            "applied input mappings"
        );
        ctx.record.payload = mapped;
        Ok(())
    }

    /// Migrates any pending legacy payload, merges the step's document
    /// through the declared output mappings into the parent flow scope
    /// (unless suppressed by `OutputBehavior::None`), and refreshes the
    /// step record's legacy payload field from the parent flow scope.
    pub fn apply_output_mappings(&self, ctx: &mut StepContext<'_>) -> Result<(), MappingError> {
        let element_instance = ctx.element_instance_key;
        let has_output_mappings = !ctx.element.output_mappings.is_empty();

        // Consume the transitional payload slot exactly once. With output
        // mappings the payload lands locally so the merge below can select
        // from it; without, it goes straight into the hierarchical space.
        if let Some(payload) = ctx.variables.get_payload(element_instance).cloned() {
            if has_output_mappings {
                ctx.variables
                    .set_variables_local_from_document(element_instance, &payload);
            } else {
                ctx.variables
                    .set_variables_from_document(element_instance, &payload);
            }
            ctx.variables.remove_payload(element_instance);
            debug!(element_instance, "migrated legacy payload");
        }

        if ctx.element.output_behavior != OutputBehavior::None && has_output_mappings {
            let flow_scope = ctx
                .flow_scope_key
                .ok_or(MappingError::MissingFlowScope(element_instance))?;

            let variables = ctx.variables.get_variables_as_document(element_instance);
            let merged = ctx
                .merge_tool
                .merge(&variables, &ctx.element.output_mappings)?;

            ctx.variables.set_variables_from_document(flow_scope, &merged);
            debug!(
                element_instance,
                flow_scope,
                mappings = ctx.element.output_mappings.len(),
                "applied output mappings"
            );
        }

        // Transitional: consumers still reading the single-payload field get
        // the parent flow scope's current view.
        if let Some(flow_scope) = ctx.flow_scope_key {
            ctx.record.payload = ctx.variables.get_variables_as_document(flow_scope);
        }
        Ok(())
    }
}
