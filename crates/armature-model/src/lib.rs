pub mod core;
pub mod epoch;
pub mod store;

#[cfg(any(test, feature = "fixture"))]
pub mod fixture {

    use serde::{Deserialize, Serialize};

    use crate::core::{ResourceSpec, ResourceStatus};

    // minimal spec and status used by tests across the workspace
    #[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
    pub struct TestSpec {
        pub replica: u16,
    }

    impl ResourceSpec for TestSpec {
        const KIND: &'static str = "Test";
        type Status = TestStatus;
    }

    #[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
    pub struct TestStatus {
        pub up: bool,
    }

    impl ResourceStatus for TestStatus {}
}
