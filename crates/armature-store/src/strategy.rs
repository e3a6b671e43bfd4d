use armature_model::core::ResourceSpec;
use armature_model::store::ResourceObject;

use crate::FieldError;

/// Per-kind policy bundle, bound to its kind at registration time.
///
/// Everything kind specific lives behind this trait so the store engine
/// stays kind agnostic. All hooks are pure functions of the object they are
/// given; they may not consult other objects.
pub trait ResourceStrategy: Send + Sync + 'static {
    type Spec: ResourceSpec;

    /// Fill unset fields with kind defaults.
    ///
    /// Runs exactly once, on create, immediately before validation. Never
    /// runs on update, so caller supplied changes are not silently
    /// overwritten. Must be idempotent.
    fn prepare_for_create(&self, _obj: &mut ResourceObject<Self::Spec>) {}

    /// Return every independent violation of the post-default object.
    ///
    /// An empty list accepts the object; any violation blocks the mutation.
    fn validate(&self, _obj: &ResourceObject<Self::Spec>) -> Vec<FieldError> {
        Vec::new()
    }

    /// Field paths beyond `metadata.name` and `metadata.namespace` that may
    /// appear in field selectors for this kind. Closed allowlist.
    fn selector_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// Comparable value of a declared selector field on this object.
    fn selector_value(
        &self,
        _obj: &ResourceObject<Self::Spec>,
        _field: &str,
    ) -> Option<String> {
        None
    }
}
