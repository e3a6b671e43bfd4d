use serde::{Deserialize, Serialize};

use armature_model::core::ResourceStatus;

/// Observed state of a university, maintained by its controller.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityStatus {
    pub enrolled_students: i32,
}

impl ResourceStatus for UniversityStatus {}
