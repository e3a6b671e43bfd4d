use std::fmt;

use armature_model::core::{ObjectRef, Revision};

use crate::backend::BackendError;
use crate::selector::SelectorError;

/// Single validation violation, addressed by field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete set of violations found on one object, never truncated to the
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid object: ")?;
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Error from a store operation.
///
/// Every operation either fully succeeds or fails with exactly one of these,
/// leaving stored state unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("'{0}' already exists")]
    AlreadyExists(ObjectRef),
    #[error("'{0}' not found")]
    NotFound(ObjectRef),
    #[error("revision conflict on '{key}': submitted {submitted}, current {current:?}")]
    Conflict {
        key: ObjectRef,
        submitted: Revision,
        current: Option<Revision>,
    },
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("backend error: {0}")]
    Backend(#[source] BackendError),
}
