use tracing::debug;

use armature_model::store::ResourceObject;
use armature_store::FieldError;
use armature_store::strategy::ResourceStrategy;

use super::{DEFAULT_REPLICAS, PoseidonSpec};

/// selector path resolving to the driven deployment's name
pub const DEPLOYMENT_NAME_FIELD: &str = "spec.deployment.name";

#[derive(Debug, Default)]
pub struct PoseidonStrategy;

impl ResourceStrategy for PoseidonStrategy {
    type Spec = PoseidonSpec;

    fn prepare_for_create(&self, obj: &mut ResourceObject<PoseidonSpec>) {
        if obj.spec.deployment.replicas.is_none() {
            debug!(name = obj.meta.name(), "defaulting replicas");
            obj.spec.deployment.replicas = Some(DEFAULT_REPLICAS);
        }
    }

    fn validate(&self, obj: &ResourceObject<PoseidonSpec>) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if let Some(replicas) = obj.spec.deployment.replicas {
            if replicas < 0 {
                errors.push(FieldError::new(
                    "spec.deployment.replicas",
                    "may not be negative",
                ));
            }
        }

        errors
    }

    fn selector_fields(&self) -> &'static [&'static str] {
        &[DEPLOYMENT_NAME_FIELD]
    }

    fn selector_value(&self, obj: &ResourceObject<PoseidonSpec>, field: &str) -> Option<String> {
        match field {
            DEPLOYMENT_NAME_FIELD => Some(obj.spec.deployment.name.clone()),
            _ => None,
        }
    }
}
