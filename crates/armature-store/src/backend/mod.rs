mod memory;

pub use memory::MemoryBackend;

use armature_model::core::{ObjectRef, ResourceSpec, Revision};
use armature_model::store::ResourceObject;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("object not found")]
    NotFound,
    #[error("revision conflict, current: {current:?}")]
    Conflict { current: Option<Revision> },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Compare-and-swap expectation attached to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionCheck {
    /// the identity must not exist
    Absent,
    /// the identity must exist at exactly this revision
    Match(Revision),
    /// no expectation
    Any,
}

/// Durable persistence contract consumed by the store.
///
/// Single-object compare-and-swap is the only transactional guarantee the
/// store relies on; it never assumes cross-object transactions. Transient
/// failures are surfaced to the caller as-is, never retried here.
#[allow(async_fn_in_trait)]
pub trait StoreBackend<S: ResourceSpec>: Send + Sync {
    /// write the object if the revision check holds, returning the newly
    /// assigned revision which is strictly greater than any prior stamp of
    /// the identity
    async fn put(
        &self,
        obj: ResourceObject<S>,
        check: RevisionCheck,
    ) -> Result<Revision, BackendError>;

    async fn get(&self, key: &ObjectRef) -> Result<ResourceObject<S>, BackendError>;

    /// all objects of the kind, optionally restricted to one namespace
    async fn scan(&self, namespace: Option<&str>) -> Result<Vec<ResourceObject<S>>, BackendError>;

    async fn delete(&self, key: &ObjectRef, check: RevisionCheck) -> Result<(), BackendError>;
}
