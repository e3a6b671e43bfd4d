//!
//! # Process Context
//!
//! Owns the kind registry and one store per registered kind. Provisioned
//! once at startup and shared from there; every kind-specific strategy is
//! bound to its store here and nowhere else.
//!
use std::sync::Arc;

use armature_store::backend::MemoryBackend;
use armature_store::registry::{KindMeta, KindRegistry, RegistryError};
use armature_store::store::ResourceStore;

use crate::poseidon::{PoseidonSpec, PoseidonStrategy};
use crate::university::{UniversitySpec, UniversityStrategy};

pub type SharedContext = Arc<Context>;

pub type UniversityStore = ResourceStore<UniversityStrategy, MemoryBackend<UniversitySpec>>;
pub type PoseidonStore = ResourceStore<PoseidonStrategy, MemoryBackend<PoseidonSpec>>;

#[derive(Debug)]
pub struct Context {
    registry: Arc<KindRegistry>,
    universities: UniversityStore,
    poseidons: PoseidonStore,
}

impl Context {
    /// provision the registry and one store per kind
    pub fn new() -> Result<Self, RegistryError> {
        let mut registry = KindRegistry::new();
        registry.register::<UniversitySpec>()?;
        registry.register::<PoseidonSpec>()?;
        let registry = Arc::new(registry);

        let universities = ResourceStore::new(
            &registry,
            UniversityStrategy::default(),
            MemoryBackend::new(),
        )?;
        let poseidons = ResourceStore::new(
            &registry,
            PoseidonStrategy::default(),
            MemoryBackend::new(),
        )?;

        Ok(Self {
            registry,
            universities,
            poseidons,
        })
    }

    pub fn shared() -> Result<SharedContext, RegistryError> {
        Ok(Arc::new(Self::new()?))
    }

    pub fn universities(&self) -> &UniversityStore {
        &self.universities
    }

    pub fn poseidons(&self) -> &PoseidonStore {
        &self.poseidons
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// kind name dispatch for the protocol boundary
    pub fn lookup_kind(&self, kind: &str) -> Result<&KindMeta, RegistryError> {
        self.registry.lookup(kind)
    }
}

#[cfg(test)]
mod test {

    use armature_model::store::ResourceObject;
    use armature_store::registry::RegistryError;
    use armature_store::{StoreError, ValidationErrors};

    use crate::poseidon::{DeploymentTemplate, PoseidonSpec};
    use crate::university::{DEFAULT_MAX_STUDENTS, UniversitySpec, UniversityStatus};

    use super::Context;

    fn university(namespace: &str, max_students: Option<i32>) -> ResourceObject<UniversitySpec> {
        ResourceObject::with_namespace(
            "miskatonic-university",
            namespace,
            UniversitySpec {
                faculty_size: 7,
                max_students,
            },
        )
    }

    fn poseidon(name: &str, deployment: &str) -> ResourceObject<PoseidonSpec> {
        ResourceObject::with_namespace(
            name,
            "default",
            PoseidonSpec {
                deployment: DeploymentTemplate {
                    name: deployment.to_owned(),
                    replicas: None,
                },
            },
        )
    }

    #[test]
    fn test_kind_lookup() {
        let ctx = Context::new().expect("provisioned");

        assert_eq!(ctx.lookup_kind("University").expect("found").kind(), "University");
        assert!(ctx.lookup_kind("Poseidon").expect("found").namespaced());
        assert_eq!(
            ctx.lookup_kind("Olympus").unwrap_err(),
            RegistryError::UnknownKind("Olympus".to_owned())
        );
        assert_eq!(ctx.registry().len(), 2);
    }

    #[fluvio_future::test]
    async fn test_university_crud_round_trip() {
        let ctx = Context::new().expect("provisioned");
        let store = ctx.universities();

        // create returns the object with the unset cap defaulted
        let instance = university("default", None);
        let created = store.create(instance.clone()).await.expect("created");
        assert_eq!(created.spec.faculty_size, 7);
        assert_eq!(created.spec.max_students, Some(DEFAULT_MAX_STUDENTS));

        // list returns the single item with the defaulted spec
        let list = store.list(None, None).await.expect("listed");
        assert_eq!(list.len(), 1);
        assert_eq!(list.items[0].spec, created.spec);

        // get returns the same spec
        let fetched = store.get(&instance.key()).await.expect("found");
        assert_eq!(fetched.spec, created.spec);

        // delete removes the item from list
        store.delete(&instance.key()).await.expect("deleted");
        let list = store.list(None, None).await.expect("listed");
        assert_eq!(list.len(), 0);
        assert!(matches!(
            store.get(&instance.key()).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[fluvio_future::test]
    async fn test_university_with_too_many_students() {
        let ctx = Context::new().expect("provisioned");
        let store = ctx.universities();

        let err = store
            .create(university("university-test-too-many", Some(151)))
            .await
            .unwrap_err();
        let StoreError::Validation(ValidationErrors(errors)) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "spec.maxStudents");
        assert!(store.list(None, None).await.expect("listed").is_empty());
    }

    #[fluvio_future::test]
    async fn test_university_with_not_enough_students() {
        let ctx = Context::new().expect("provisioned");
        let store = ctx.universities();

        let err = store
            .create(university("university-test-not-enough", Some(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.list(None, None).await.expect("listed").is_empty());
    }

    #[fluvio_future::test]
    async fn test_university_inside_bounds() {
        let ctx = Context::new().expect("provisioned");
        let store = ctx.universities();

        let created = store
            .create(university("default", Some(150)))
            .await
            .expect("created");
        let list = store.list(None, None).await.expect("listed");
        assert_eq!(list.len(), 1);
        assert_eq!(list.items[0].spec, created.spec);
    }

    #[fluvio_future::test]
    async fn test_university_status_update() {
        let ctx = Context::new().expect("provisioned");
        let store = ctx.universities();

        let created = store.create(university("default", None)).await.expect("created");
        let updated = store
            .update_status(
                &created.key(),
                UniversityStatus {
                    enrolled_students: 12,
                },
            )
            .await
            .expect("status updated");

        assert_eq!(updated.status.enrolled_students, 12);
        assert!(updated.revision() > created.revision());
        // spec untouched by the status path
        assert_eq!(updated.spec, created.spec);
    }

    #[fluvio_future::test]
    async fn test_poseidon_field_selector_list() {
        let ctx = Context::new().expect("provisioned");
        let store = ctx.poseidons();

        let instance1 = poseidon("instance-1", "i1");
        let instance2 = poseidon("instance-2", "i2");
        store.create(instance1).await.expect("created");
        store.create(instance2).await.expect("created");

        let list = store
            .list(None, Some("spec.deployment.name=i1"))
            .await
            .expect("listed");
        assert_eq!(list.len(), 1);
        assert_eq!(list.items[0].meta.name(), "instance-1");

        let list = store
            .list(None, Some("spec.deployment.name=i2"))
            .await
            .expect("listed");
        assert_eq!(list.len(), 1);
        assert_eq!(list.items[0].meta.name(), "instance-2");

        // no selector returns both
        let list = store.list(None, None).await.expect("listed");
        assert_eq!(list.len(), 2);
    }

    #[fluvio_future::test]
    async fn test_poseidon_unsupported_selector() {
        let ctx = Context::new().expect("provisioned");
        let store = ctx.poseidons();

        store.create(poseidon("instance-1", "i1")).await.expect("created");

        let err = store
            .list(None, Some("spec.podSpec.name=i1"))
            .await
            .unwrap_err();
        let StoreError::Selector(selector_err) = err else {
            panic!("expected selector error");
        };
        let message = selector_err.to_string();
        assert!(message.contains("spec.podSpec.name"));
        assert!(message.contains("spec.deployment.name"));
        assert!(message.contains("metadata.name"));
    }
}
