use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Version stamp assigned by the store on every successful mutation.
///
/// Opaque to callers except for equality and ordering comparisons. A stamp
/// strictly increases over the lifetime of an object identity.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Revision(u64);

impl Revision {
    /// stamp carried by an object that has never been persisted
    pub const INITIAL: Revision = Revision(0);
}

impl From<u64> for Revision {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an object within its kind.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObjectRef {
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectRef {
    /// identity of a cluster scoped object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Standard metadata carried by every stored object.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeta {
    name: String,
    namespace: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    labels: HashMap<String, String>,
    revision: Revision,
}

impl ResourceMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn set_labels<T: Into<String>>(mut self, labels: Vec<(T, T)>) -> Self {
        self.labels = labels
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self
    }

    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn set_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }

    pub fn key(&self) -> ObjectRef {
        ObjectRef {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for ResourceMeta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod test {

    use super::{ObjectRef, ResourceMeta, Revision};

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new("alpha").to_string(), "alpha");
        assert_eq!(
            ObjectRef::namespaced("default", "alpha").to_string(),
            "default/alpha"
        );
    }

    #[test]
    fn test_object_ref_ordering() {
        let mut refs = vec![
            ObjectRef::namespaced("default", "b"),
            ObjectRef::namespaced("default", "a"),
            ObjectRef::namespaced("alt", "z"),
        ];
        refs.sort();
        assert_eq!(refs[0].namespace.as_deref(), Some("alt"));
        assert_eq!(refs[1].name, "a");
        assert_eq!(refs[2].name, "b");
    }

    #[test]
    fn test_revision_ordering() {
        let first = Revision::from(1);
        let second = Revision::from(2);
        assert!(second > first);
        assert_eq!(Revision::INITIAL, Revision::from(0));
    }

    #[test]
    fn test_meta_labels() {
        let meta = ResourceMeta::with_namespace("alpha", "default")
            .set_labels(vec![("foo", "1"), ("bar", "2")]);
        assert_eq!(meta.labels().len(), 2);
        assert_eq!(meta.labels().get("foo").map(String::as_str), Some("1"));
        assert_eq!(meta.key(), ObjectRef::namespaced("default", "alpha"));
    }
}
