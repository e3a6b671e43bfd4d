use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

use tracing::trace;

use super::Epoch;

/// Value wrapped with the epoch at which it last changed.
#[derive(Debug, Default, Clone)]
pub struct EpochCounter<T> {
    epoch: Epoch,
    inner: T,
}

impl<T> EpochCounter<T> {
    pub fn new(inner: T) -> Self {
        Self { epoch: 0, inner }
    }

    #[inline]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch;
    }

    pub(crate) fn increment(&mut self) {
        self.epoch += 1;
    }

    pub(crate) fn decrement(&mut self) {
        self.epoch -= 1;
    }

    #[inline]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn inner_owned(self) -> T {
        self.inner
    }
}

impl<T> Deref for EpochCounter<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> DerefMut for EpochCounter<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T> From<T> for EpochCounter<T> {
    fn from(inner: T) -> Self {
        Self::new(inner)
    }
}

/// Hash map whose values remember the epoch of their last change.
///
/// The map keeps its own epoch, a fence and the history of removed values.
/// Changes since any epoch at or after the fence can be answered as a delta;
/// anything older falls back to a full sync.
#[derive(Debug, Default)]
pub struct EpochMap<K, V> {
    epoch: EpochCounter<()>,
    fence: EpochCounter<()>,
    values: HashMap<K, EpochCounter<V>>,
    deleted: Vec<EpochCounter<V>>,
}

impl<K, V> Deref for EpochMap<K, V> {
    type Target = HashMap<K, EpochCounter<V>>;

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl<K, V> DerefMut for EpochMap<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.values
    }
}

impl<K, V> EpochMap<K, V> {
    pub fn increment_epoch(&mut self) {
        self.epoch.increment();
    }

    pub fn decrement_epoch(&mut self) {
        self.epoch.decrement();
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch.epoch()
    }
}

impl<K, V> EpochMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    pub fn new() -> Self {
        Self::new_with_map(HashMap::new())
    }

    pub fn new_with_map(values: HashMap<K, EpochCounter<V>>) -> Self {
        Self {
            epoch: EpochCounter::default(),
            fence: EpochCounter::default(),
            values,
            deleted: vec![],
        }
    }

    /// insert or replace a value, stamping the current epoch
    //  None means the key was new, Some reports whether the value differed
    pub fn update(&mut self, key: K, new_value: V) -> Option<bool> {
        let current_epoch = self.epoch.epoch();
        let mut new_value = EpochCounter::new(new_value);

        trace!(current_epoch, "updating");

        if let Some(existing_value) = self.values.get_mut(&key) {
            let changed = existing_value.inner() != new_value.inner();
            if changed {
                new_value.set_epoch(current_epoch);
                *existing_value = new_value;
            }
            Some(changed)
        } else {
            new_value.set_epoch(current_epoch);
            self.values.insert(key, new_value);
            None
        }
    }

    /// remove existing value
    /// if successful, remove are added to history
    pub fn remove<Q: ?Sized>(&mut self, k: &Q) -> Option<EpochCounter<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: Clone,
    {
        if let Some((_, mut old_value)) = self.values.remove_entry(k) {
            old_value.set_epoch(self.epoch.epoch());
            self.deleted.push(old_value.clone());
            Some(old_value)
        } else {
            None
        }
    }

    /// fence history to current epoch,
    /// older before fence will be lost
    pub fn mark_fence(&mut self) {
        self.deleted = vec![];
        self.fence = self.epoch.clone();
    }
}

impl<K, V> EpochMap<K, V>
where
    K: Clone,
{
    pub fn clone_keys(&self) -> Vec<K> {
        self.keys().cloned().collect()
    }
}

impl<K, V> EpochMap<K, V>
where
    K: Clone,
    V: Clone,
{
    pub fn clone_values(&self) -> Vec<V> {
        self.values().cloned().map(|c| c.inner_owned()).collect()
    }

    /// find all changes given epoch
    /// if epoch is before fence, return full list with epoch,
    /// otherwise return delta changes
    /// user should keep that epoch and do subsequent changes
    pub fn changes_since(&self, epoch: Epoch) -> EpochChanges<V> {
        if epoch < self.fence.epoch() {
            return EpochChanges::new(
                self.epoch.epoch(),
                EpochDeltaChanges::SyncAll(self.clone_values()),
            );
        }

        if epoch == self.epoch() {
            return EpochChanges::new(self.epoch.epoch(), EpochDeltaChanges::empty());
        }

        let updates = self
            .values()
            .filter_map(|value| {
                if value.epoch > epoch {
                    Some(value.inner().clone())
                } else {
                    None
                }
            })
            .collect();

        let deletes = self
            .deleted
            .iter()
            .filter_map(|value| {
                if value.epoch > epoch {
                    Some(value.inner().clone())
                } else {
                    None
                }
            })
            .collect();

        EpochChanges::new(
            self.epoch.epoch(),
            EpochDeltaChanges::Changes((updates, deletes)),
        )
    }
}

/// Answer to a changes-since query.
#[derive(Debug)]
pub struct EpochChanges<V> {
    epoch: Epoch,
    changes: EpochDeltaChanges<V>,
}

impl<V> EpochChanges<V> {
    pub fn new(epoch: Epoch, changes: EpochDeltaChanges<V>) -> Self {
        Self { epoch, changes }
    }

    /// epoch to resume from on the next query
    #[inline]
    pub fn current_epoch(&self) -> &Epoch {
        &self.epoch
    }

    pub fn is_sync_all(&self) -> bool {
        matches!(&self.changes, EpochDeltaChanges::SyncAll(_))
    }

    /// updates and deletes; for a full sync the delete set is empty
    pub fn parts(self) -> (Vec<V>, Vec<V>) {
        match self.changes {
            EpochDeltaChanges::SyncAll(all) => (all, vec![]),
            EpochDeltaChanges::Changes(changes) => changes,
        }
    }
}

#[derive(Debug)]
pub enum EpochDeltaChanges<V> {
    SyncAll(Vec<V>),
    Changes((Vec<V>, Vec<V>)),
}

impl<V> EpochDeltaChanges<V> {
    pub fn empty() -> Self {
        Self::Changes((vec![], vec![]))
    }
}
