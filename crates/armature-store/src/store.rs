//!
//! # Generic Object Store
//!
//! Kind-agnostic CRUD and list engine. It composes a kind's strategy, the
//! field selector engine and a persistence backend behind uniform
//! operations, and keeps a local cache for collection versioning and change
//! notification.
//!
//! Mutations of one identity serialize through the backend's
//! compare-and-swap; distinct identities only share the brief cache write
//! section. Defaulting and validation run on a private copy before anything
//! is written, so readers can never observe a partially prepared object.
//!
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use armature_model::core::{ObjectRef, ResourceSpec};
use armature_model::epoch::Epoch;
use armature_model::store::actions::StoreUpdate;
use armature_model::store::{CacheListener, ResourceList, ResourceObject, StoreCache};

use crate::backend::{BackendError, RevisionCheck, StoreBackend};
use crate::registry::{KindMeta, KindRegistry, RegistryError};
use crate::selector::FieldSelector;
use crate::strategy::ResourceStrategy;
use crate::{FieldError, StoreError, ValidationErrors};

pub struct ResourceStore<St, B>
where
    St: ResourceStrategy,
    B: StoreBackend<St::Spec>,
{
    meta: KindMeta,
    strategy: St,
    backend: B,
    cache: Arc<StoreCache<St::Spec>>,
}

impl<St, B> ResourceStore<St, B>
where
    St: ResourceStrategy,
    B: StoreBackend<St::Spec>,
{
    /// Bind a store to its registered kind.
    ///
    /// The kind must already be in the registry; a store for an unregistered
    /// kind cannot be constructed.
    pub fn new(registry: &KindRegistry, strategy: St, backend: B) -> Result<Self, RegistryError> {
        let meta = *registry.lookup(<St::Spec as ResourceSpec>::KIND)?;
        Ok(Self {
            meta,
            strategy,
            backend,
            cache: StoreCache::new_shared(),
        })
    }

    pub fn kind_meta(&self) -> &KindMeta {
        &self.meta
    }

    pub fn strategy(&self) -> &St {
        &self.strategy
    }

    /// current collection epoch, monotonic over mutations
    pub async fn epoch(&self) -> Epoch {
        self.cache.epoch().await
    }

    /// listener over collection changes, usable for list-then-watch
    pub fn change_listener(&self) -> CacheListener<St::Spec> {
        self.cache.change_listener()
    }

    #[instrument(skip(self, obj))]
    pub async fn create(
        &self,
        mut obj: ResourceObject<St::Spec>,
    ) -> Result<ResourceObject<St::Spec>, StoreError> {
        let key = obj.key();
        info!(kind = self.meta.kind(), %key, "creating");

        self.check_scope(&obj)?;
        self.strategy.prepare_for_create(&mut obj);
        self.check_valid(&obj)?;

        let revision = match self.backend.put(obj.clone(), RevisionCheck::Absent).await {
            Ok(revision) => revision,
            Err(BackendError::Conflict { .. }) => return Err(StoreError::AlreadyExists(key)),
            Err(err) => return Err(StoreError::Backend(err)),
        };
        obj.meta.set_revision(revision);

        self.cache.apply(StoreUpdate::Apply(obj.clone())).await;
        info!(kind = self.meta.kind(), %key, %revision, "created");
        Ok(obj)
    }

    pub async fn get(&self, key: &ObjectRef) -> Result<ResourceObject<St::Spec>, StoreError> {
        match self.backend.get(key).await {
            Ok(obj) => Ok(obj),
            Err(BackendError::NotFound) => Err(StoreError::NotFound(key.clone())),
            Err(err) => Err(StoreError::Backend(err)),
        }
    }

    /// All objects of the kind, optionally restricted to one namespace and
    /// filtered by a selector expression.
    ///
    /// The selector is parsed and checked against the kind's allowlist
    /// before any object is examined, so an unsupported field never yields
    /// partial results. Items come back in stable identity order.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        namespace: Option<&str>,
        selector: Option<&str>,
    ) -> Result<ResourceList<St::Spec>, StoreError> {
        let selector = FieldSelector::parse(selector.unwrap_or_default())?;
        selector.check_fields(self.strategy.selector_fields())?;

        let mut items = self
            .backend
            .scan(namespace)
            .await
            .map_err(StoreError::Backend)?;
        items.retain(|obj| selector.matches(obj, &self.strategy));
        items.sort_by(|a, b| a.key().cmp(&b.key()));

        let revision = self.cache.epoch().await;
        debug!(
            kind = self.meta.kind(),
            items = items.len(),
            revision,
            "list"
        );
        Ok(ResourceList { revision, items })
    }

    /// Replace an existing object.
    ///
    /// The caller-supplied revision must match the stored one; on mismatch
    /// nothing is written and the conflict is reported. Defaults are not
    /// re-applied.
    #[instrument(skip(self, obj))]
    pub async fn update(
        &self,
        mut obj: ResourceObject<St::Spec>,
    ) -> Result<ResourceObject<St::Spec>, StoreError> {
        let key = obj.key();

        self.check_scope(&obj)?;
        self.check_valid(&obj)?;

        let submitted = obj.revision();
        let revision = match self
            .backend
            .put(obj.clone(), RevisionCheck::Match(submitted))
            .await
        {
            Ok(revision) => revision,
            Err(BackendError::NotFound) => return Err(StoreError::NotFound(key)),
            Err(BackendError::Conflict { current }) => {
                return Err(StoreError::Conflict {
                    key,
                    submitted,
                    current,
                });
            }
            Err(err) => return Err(StoreError::Backend(err)),
        };
        obj.meta.set_revision(revision);

        self.cache.apply(StoreUpdate::Apply(obj.clone())).await;
        info!(kind = self.meta.kind(), %key, %revision, "updated");
        Ok(obj)
    }

    /// Replace only the status of an existing object.
    ///
    /// Controllers write status; it is neither defaulted nor validated.
    #[instrument(skip(self, status))]
    pub async fn update_status(
        &self,
        key: &ObjectRef,
        status: <St::Spec as ResourceSpec>::Status,
    ) -> Result<ResourceObject<St::Spec>, StoreError> {
        let mut current = self.get(key).await?;
        let submitted = current.revision();
        current.set_status(status);

        let revision = match self
            .backend
            .put(current.clone(), RevisionCheck::Match(submitted))
            .await
        {
            Ok(revision) => revision,
            Err(BackendError::NotFound) => return Err(StoreError::NotFound(key.clone())),
            Err(BackendError::Conflict { current }) => {
                return Err(StoreError::Conflict {
                    key: key.clone(),
                    submitted,
                    current,
                });
            }
            Err(err) => return Err(StoreError::Backend(err)),
        };
        current.meta.set_revision(revision);

        self.cache.apply(StoreUpdate::Apply(current.clone())).await;
        debug!(kind = self.meta.kind(), %key, %revision, "status updated");
        Ok(current)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, key: &ObjectRef) -> Result<(), StoreError> {
        match self.backend.delete(key, RevisionCheck::Any).await {
            Ok(()) => {
                self.cache.apply(StoreUpdate::Delete(key.clone())).await;
                info!(kind = self.meta.kind(), %key, "deleted");
                Ok(())
            }
            Err(BackendError::NotFound) => Err(StoreError::NotFound(key.clone())),
            Err(err) => Err(StoreError::Backend(err)),
        }
    }

    /// namespaced kinds require a namespace, cluster scoped kinds forbid one
    fn check_scope(&self, obj: &ResourceObject<St::Spec>) -> Result<(), StoreError> {
        let error = match (self.meta.namespaced(), obj.meta.namespace()) {
            (true, None) => FieldError::new(
                "metadata.namespace",
                format!("{} is namespace scoped, namespace is required", self.meta.kind()),
            ),
            (false, Some(_)) => FieldError::new(
                "metadata.namespace",
                format!("{} is cluster scoped, namespace must not be set", self.meta.kind()),
            ),
            _ => return Ok(()),
        };
        Err(StoreError::Validation(ValidationErrors(vec![error])))
    }

    fn check_valid(&self, obj: &ResourceObject<St::Spec>) -> Result<(), StoreError> {
        let errors = self.strategy.validate(obj);
        if errors.is_empty() {
            Ok(())
        } else {
            debug!(
                kind = self.meta.kind(),
                key = %obj.key(),
                violations = errors.len(),
                "validation rejected"
            );
            Err(StoreError::Validation(ValidationErrors(errors)))
        }
    }
}

impl<St, B> fmt::Debug for ResourceStore<St, B>
where
    St: ResourceStrategy,
    B: StoreBackend<St::Spec>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} store", self.meta.kind())
    }
}

impl<St, B> fmt::Display for ResourceStore<St, B>
where
    St: ResourceStrategy,
    B: StoreBackend<St::Spec>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} store", self.meta.kind())
    }
}
