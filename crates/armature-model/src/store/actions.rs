use crate::core::{ObjectRef, ResourceSpec};

use super::ResourceObject;

/// Change fed into a store cache.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreUpdate<S: ResourceSpec> {
    Apply(ResourceObject<S>),
    Delete(ObjectRef),
}
