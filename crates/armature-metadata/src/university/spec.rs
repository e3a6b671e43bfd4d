//!
//! # University Spec
//!
//! Desired state of a university: the size of its faculty and the cap on
//! admitted students. The cap is optional on input and defaulted at create
//! time.
//!
use serde::{Deserialize, Serialize};

use armature_model::core::ResourceSpec;

use super::UniversityStatus;

/// cap applied when the caller leaves `max_students` unset
pub const DEFAULT_MAX_STUDENTS: i32 = 15;

pub const MIN_STUDENTS_LIMIT: i32 = 1;
pub const MAX_STUDENTS_LIMIT: i32 = 150;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversitySpec {
    pub faculty_size: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_students: Option<i32>,
}

impl ResourceSpec for UniversitySpec {
    const KIND: &'static str = "University";
    type Status = UniversityStatus;
}
