use std::collections::BTreeMap;

use tracing::debug;

use armature_model::core::ResourceSpec;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("kind '{0}' is already registered")]
    DuplicateKind(String),
    #[error("unknown kind '{0}'")]
    UnknownKind(String),
}

/// Static facts about a registered kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindMeta {
    kind: &'static str,
    namespaced: bool,
}

impl KindMeta {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn namespaced(&self) -> bool {
        self.namespaced
    }
}

/// Process-wide table of resource kinds.
///
/// Populated once during startup, immutable afterward; concurrent reads need
/// no synchronization. Share it behind an `Arc` once registration is done.
#[derive(Debug, Default)]
pub struct KindRegistry {
    kinds: BTreeMap<&'static str, KindMeta>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: ResourceSpec>(&mut self) -> Result<(), RegistryError> {
        if self.kinds.contains_key(S::KIND) {
            return Err(RegistryError::DuplicateKind(S::KIND.to_owned()));
        }

        debug!(kind = S::KIND, namespaced = S::NAMESPACED, "registered");
        self.kinds.insert(
            S::KIND,
            KindMeta {
                kind: S::KIND,
                namespaced: S::NAMESPACED,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, kind: &str) -> Result<&KindMeta, RegistryError> {
        self.kinds
            .get(kind)
            .ok_or_else(|| RegistryError::UnknownKind(kind.to_owned()))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &KindMeta> {
        self.kinds.values()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
