use crate::document::Document;
use crate::types::Mapping;
use thiserror::Error;

/// Signalled by the merge primitive when the declared mappings cannot be
/// applied to the given document, e.g. a source path that selects no value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot apply mappings: {message}")]
pub struct ConflictError {
    pub message: String,
}

impl ConflictError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The opaque merge primitive: combines a document with declared mappings
/// into a new document, or signals a conflict.
///
/// Implementations come from the compiled process model's expression layer;
/// this crate never interprets the path syntax. A failed merge must leave
/// the base document untouched — the mapping stage relies on that to keep
/// the variable store unmodified on failure.
pub trait MergeTool {
    fn merge(&mut self, document: &Document, mappings: &[Mapping])
        -> Result<Document, ConflictError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_error_display() {
        let err = ConflictError::new("no value at $.oof");
        assert_eq!(err.to_string(), "cannot apply mappings: no value at $.oof");
    }
}
