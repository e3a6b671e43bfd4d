use crate::core::{ObjectRef, ResourceMeta, ResourceSpec, Revision};
use crate::epoch::Epoch;

/// A stored instance of a resource kind.
///
/// The store owns the authoritative copy of every object; values handed to
/// callers are always independent clones, so caller mutation never reaches
/// stored state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResourceObject<S: ResourceSpec> {
    pub meta: ResourceMeta,
    pub spec: S,
    pub status: S::Status,
}

impl<S: ResourceSpec> ResourceObject<S> {
    /// cluster scoped object with default status
    pub fn new(name: impl Into<String>, spec: S) -> Self {
        Self {
            meta: ResourceMeta::new(name),
            spec,
            status: S::Status::default(),
        }
    }

    pub fn with_namespace(
        name: impl Into<String>,
        namespace: impl Into<String>,
        spec: S,
    ) -> Self {
        Self {
            meta: ResourceMeta::with_namespace(name, namespace),
            spec,
            status: S::Status::default(),
        }
    }

    pub fn key(&self) -> ObjectRef {
        self.meta.key()
    }

    pub fn revision(&self) -> Revision {
        self.meta.revision()
    }

    pub fn set_status(&mut self, status: S::Status) {
        self.status = status;
    }
}

/// Snapshot of a collection returned by list operations.
///
/// `revision` is the collection level version at the time of the snapshot,
/// usable to request changes that happened afterward.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResourceList<S: ResourceSpec> {
    pub revision: Epoch,
    pub items: Vec<ResourceObject<S>>,
}

impl<S: ResourceSpec> ResourceList<S> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
