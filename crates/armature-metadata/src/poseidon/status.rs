use serde::{Deserialize, Serialize};

use armature_model::core::ResourceStatus;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseidonStatus;

impl ResourceStatus for PoseidonStatus {}
