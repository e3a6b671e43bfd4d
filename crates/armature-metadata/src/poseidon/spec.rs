use serde::{Deserialize, Serialize};

use armature_model::core::ResourceSpec;

use super::PoseidonStatus;

/// replica count applied when the caller leaves it unset
pub const DEFAULT_REPLICAS: i32 = 1;

/// Desired state of a poseidon: the deployment it drives.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseidonSpec {
    pub deployment: DeploymentTemplate,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTemplate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

impl ResourceSpec for PoseidonSpec {
    const KIND: &'static str = "Poseidon";
    type Status = PoseidonStatus;
}
