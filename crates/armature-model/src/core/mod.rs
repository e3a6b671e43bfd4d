mod metadata;
mod spec;

pub use metadata::{ObjectRef, ResourceMeta, Revision};
pub use spec::{ResourceSpec, ResourceStatus};
