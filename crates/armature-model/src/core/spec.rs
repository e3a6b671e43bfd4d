use std::fmt::Debug;

/// Static description of a resource kind.
///
/// One implementation exists per kind and is registered exactly once during
/// process startup. The kind name must be unique within a registry.
pub trait ResourceSpec: Debug + Default + Clone + PartialEq + Send + Sync + 'static {
    /// kind name, used for registration and lookup
    const KIND: &'static str;

    /// whether objects of this kind live inside a namespace
    const NAMESPACED: bool = true;

    type Status: ResourceStatus;
}

/// Observed state of a resource. Written by controllers, never defaulted or
/// validated on the create path.
pub trait ResourceStatus: Debug + Default + Clone + PartialEq + Send + Sync + 'static {}
