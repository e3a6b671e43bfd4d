use std::fmt;
use std::sync::Arc;

use async_lock::{RwLock, RwLockReadGuard};
use tracing::{debug, trace};

use crate::core::{ObjectRef, ResourceSpec};
use crate::epoch::{Epoch, EpochChanges, EpochMap};

use super::ResourceObject;
use super::actions::StoreUpdate;
use super::event::EventPublisher;

pub type CacheChanges<S> = EpochChanges<ResourceObject<S>>;

/// Epoch stamped in-memory view of one kind's collection.
///
/// Writes are idempotent apply/sync operations only; reads hand out guards
/// exposing the hash map API through deref. An async lock keeps readers and
/// writers thread safe, and an event publisher wakes listeners whenever the
/// collection epoch moves.
#[derive(Debug)]
pub struct StoreCache<S: ResourceSpec> {
    store: RwLock<EpochMap<ObjectRef, ResourceObject<S>>>,
    event_publisher: Arc<EventPublisher>,
}

impl<S: ResourceSpec> Default for StoreCache<S> {
    fn default() -> Self {
        Self {
            store: RwLock::new(EpochMap::new()),
            event_publisher: EventPublisher::shared(),
        }
    }
}

impl<S: ResourceSpec> StoreCache<S> {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Read guard
    #[inline(always)]
    pub async fn read(
        &self,
    ) -> RwLockReadGuard<'_, EpochMap<ObjectRef, ResourceObject<S>>> {
        self.store.read().await
    }

    /// current collection epoch
    pub async fn epoch(&self) -> Epoch {
        self.read().await.epoch()
    }

    /// copy of the value
    pub async fn value(&self, key: &ObjectRef) -> Option<ResourceObject<S>> {
        self.read().await.get(key).map(|value| value.inner().clone())
    }

    pub async fn contains_key(&self, key: &ObjectRef) -> bool {
        self.read().await.contains_key(key)
    }

    pub async fn count(&self) -> usize {
        self.read().await.len()
    }

    pub async fn clone_values(&self) -> Vec<ResourceObject<S>> {
        self.read().await.clone_values()
    }

    pub fn event_publisher(&self) -> &EventPublisher {
        &self.event_publisher
    }

    /// apply a single change to the collection
    /// the epoch moves only when the change is real, so repeated application
    /// of the same change is idempotent
    pub async fn apply(&self, update: StoreUpdate<S>) -> Option<Epoch> {
        let mut write_guard = self.store.write().await;
        write_guard.increment_epoch();

        let changed = match update {
            StoreUpdate::Apply(obj) => {
                let key = obj.key();
                match write_guard.update(key, obj) {
                    None => true,
                    Some(changed) => changed,
                }
            }
            StoreUpdate::Delete(key) => write_guard.remove(&key).is_some(),
        };

        if !changed {
            write_guard.decrement_epoch();
            trace!(kind = S::KIND, "no change, epoch reverted");
            return None;
        }

        let epoch = write_guard.epoch();
        drop(write_guard);

        self.event_publisher.store_change(epoch);
        debug!(kind = S::KIND, epoch, "applied");
        Some(epoch)
    }

    /// replace the collection with incoming objects as source of truth.
    /// anything not in the incoming list is deleted, and prior delta history
    /// is fenced off so older listeners resync in full
    pub async fn sync_all(&self, incoming: Vec<ResourceObject<S>>) -> Epoch {
        let mut write_guard = self.store.write().await;

        debug!(
            kind = S::KIND,
            epoch = write_guard.epoch(),
            incoming = incoming.len(),
            "sync all"
        );

        let mut local_keys = write_guard.clone_keys();
        write_guard.increment_epoch();

        for source in incoming {
            let key = source.key();
            write_guard.update(key.clone(), source);
            local_keys.retain(|k| k != &key);
        }

        for key in local_keys {
            write_guard.remove(&key);
        }

        write_guard.mark_fence();
        let epoch = write_guard.epoch();
        drop(write_guard);

        self.event_publisher.store_change(epoch);
        epoch
    }

    /// create new change listener
    pub fn change_listener(self: &Arc<Self>) -> CacheListener<S> {
        CacheListener::new(self.clone())
    }
}

impl<S: ResourceSpec> fmt::Display for StoreCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} cache", S::KIND)
    }
}

/// Listen for changes on a store cache.
pub struct CacheListener<S: ResourceSpec> {
    cache: Arc<StoreCache<S>>,
    last_epoch: Epoch,
}

impl<S: ResourceSpec> fmt::Debug for CacheListener<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} last:{},current:{}",
            S::KIND,
            self.last_epoch,
            self.cache.event_publisher().current_change()
        )
    }
}

impl<S: ResourceSpec> CacheListener<S> {
    fn new(cache: Arc<StoreCache<S>>) -> Self {
        Self {
            cache,
            last_epoch: 0,
        }
    }

    /// check if there should be any changes
    /// this should be done before waiting on the event listener
    /// to ensure no events are missed
    #[inline]
    pub fn has_change(&self) -> bool {
        self.cache.event_publisher().current_change() > self.last_epoch
    }

    #[inline]
    pub fn last_epoch(&self) -> Epoch {
        self.last_epoch
    }

    /// wait until the collection epoch moves past the last seen epoch
    pub async fn listen(&self) {
        if self.has_change() {
            trace!("before has change: {}", self.last_epoch);
            return;
        }

        let listener = self.cache.event_publisher().listen();

        if self.has_change() {
            trace!("after has change: {}", self.last_epoch);
            return;
        }

        listener.await;

        trace!("new change: {}", self.cache.event_publisher().current_change());
    }

    /// drain all changes since the last seen epoch
    pub async fn sync_changes(&mut self) -> CacheChanges<S> {
        let read_guard = self.cache.read().await;
        let changes = read_guard.changes_since(self.last_epoch);
        drop(read_guard);

        self.last_epoch = *changes.current_epoch();
        changes
    }
}

#[cfg(test)]
mod test {

    use crate::fixture::{TestSpec, TestStatus};
    use crate::store::ResourceObject;
    use crate::store::actions::StoreUpdate;

    use super::StoreCache;

    type TestCache = StoreCache<TestSpec>;

    fn test_object(name: &str, replica: u16) -> ResourceObject<TestSpec> {
        ResourceObject::with_namespace(name, "default", TestSpec { replica })
    }

    #[fluvio_future::test]
    async fn test_cache_apply_is_idempotent() {
        let cache = TestCache::default();
        assert_eq!(cache.epoch().await, 0);

        let obj = test_object("t1", 1);
        assert_eq!(
            cache.apply(StoreUpdate::Apply(obj.clone())).await,
            Some(1)
        );
        assert_eq!(cache.count().await, 1);

        // same object again, epoch stays put
        assert!(cache.apply(StoreUpdate::Apply(obj.clone())).await.is_none());
        assert_eq!(cache.epoch().await, 1);

        // real change moves the epoch
        let mut changed = obj;
        changed.set_status(TestStatus { up: true });
        assert_eq!(cache.apply(StoreUpdate::Apply(changed)).await, Some(2));
    }

    #[fluvio_future::test]
    async fn test_cache_delete_and_changes() {
        let cache = TestCache::new_shared();
        let mut listener = cache.change_listener();

        cache
            .apply(StoreUpdate::Apply(test_object("t1", 1)))
            .await
            .expect("applied");
        cache
            .apply(StoreUpdate::Apply(test_object("t2", 2)))
            .await
            .expect("applied");

        let changes = listener.sync_changes().await;
        let (updates, deletes) = changes.parts();
        assert_eq!(updates.len(), 2);
        assert!(deletes.is_empty());

        // deleting an absent key leaves the epoch alone
        let absent = test_object("t3", 0).key();
        assert!(cache.apply(StoreUpdate::Delete(absent)).await.is_none());

        cache
            .apply(StoreUpdate::Delete(test_object("t1", 1).key()))
            .await
            .expect("deleted");

        let (updates, deletes) = listener.sync_changes().await.parts();
        assert!(updates.is_empty());
        assert_eq!(deletes.len(), 1);
        assert_eq!(cache.count().await, 1);
    }

    #[fluvio_future::test]
    async fn test_cache_sync_all_fences_history() {
        let cache = TestCache::new_shared();
        let mut listener = cache.change_listener();

        cache
            .apply(StoreUpdate::Apply(test_object("t1", 1)))
            .await
            .expect("applied");
        listener.sync_changes().await;

        // replace the collection wholesale
        let epoch = cache
            .sync_all(vec![test_object("t2", 2), test_object("t3", 3)])
            .await;
        assert_eq!(epoch, 2);
        assert_eq!(cache.count().await, 2);
        assert!(!cache.contains_key(&test_object("t1", 1).key()).await);

        // listener epoch predates the fence, full resync
        let changes = listener.sync_changes().await;
        assert!(changes.is_sync_all());
        let (updates, _) = changes.parts();
        assert_eq!(updates.len(), 2);
    }

    #[fluvio_future::test]
    async fn test_cache_listener_wakes_on_change() {
        let cache = TestCache::new_shared();
        let listener = cache.change_listener();

        assert!(!listener.has_change());
        cache
            .apply(StoreUpdate::Apply(test_object("t1", 1)))
            .await
            .expect("applied");
        assert!(listener.has_change());

        // with a pending change, listen returns immediately
        listener.listen().await;
    }
}
