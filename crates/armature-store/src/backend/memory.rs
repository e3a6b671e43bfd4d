use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_lock::RwLock;
use tracing::trace;

use armature_model::core::{ObjectRef, ResourceSpec, Revision};
use armature_model::store::ResourceObject;

use super::{BackendError, RevisionCheck, StoreBackend};

/// Process-local persistence backend.
///
/// Revisions come from a backend-wide monotonic counter, so every successful
/// mutation of an identity observes a strictly greater stamp. Reads hand out
/// clones only.
#[derive(Debug)]
pub struct MemoryBackend<S: ResourceSpec> {
    data: RwLock<HashMap<ObjectRef, ResourceObject<S>>>,
    revision: AtomicU64,
}

impl<S: ResourceSpec> Default for MemoryBackend<S> {
    fn default() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            revision: AtomicU64::new(0),
        }
    }
}

impl<S: ResourceSpec> MemoryBackend<S> {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_revision(&self) -> Revision {
        Revision::from(self.revision.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl<S: ResourceSpec> StoreBackend<S> for MemoryBackend<S> {
    async fn put(
        &self,
        mut obj: ResourceObject<S>,
        check: RevisionCheck,
    ) -> Result<Revision, BackendError> {
        let key = obj.key();
        let mut data = self.data.write().await;

        match (data.get(&key), check) {
            (Some(existing), RevisionCheck::Absent) => {
                return Err(BackendError::Conflict {
                    current: Some(existing.revision()),
                });
            }
            (Some(existing), RevisionCheck::Match(expected))
                if existing.revision() != expected =>
            {
                return Err(BackendError::Conflict {
                    current: Some(existing.revision()),
                });
            }
            (None, RevisionCheck::Match(_)) => return Err(BackendError::NotFound),
            _ => {}
        }

        let revision = self.next_revision();
        obj.meta.set_revision(revision);
        trace!(%key, %revision, "put");
        data.insert(key, obj);
        Ok(revision)
    }

    async fn get(&self, key: &ObjectRef) -> Result<ResourceObject<S>, BackendError> {
        self.data
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    async fn scan(&self, namespace: Option<&str>) -> Result<Vec<ResourceObject<S>>, BackendError> {
        let data = self.data.read().await;
        let items = data
            .values()
            .filter(|obj| match namespace {
                Some(ns) => obj.meta.namespace() == Some(ns),
                None => true,
            })
            .cloned()
            .collect();
        Ok(items)
    }

    async fn delete(&self, key: &ObjectRef, check: RevisionCheck) -> Result<(), BackendError> {
        let mut data = self.data.write().await;

        let Some(existing) = data.get(key) else {
            return Err(BackendError::NotFound);
        };
        if let RevisionCheck::Match(expected) = check {
            if existing.revision() != expected {
                return Err(BackendError::Conflict {
                    current: Some(existing.revision()),
                });
            }
        }

        trace!(%key, "delete");
        data.remove(key);
        Ok(())
    }
}
