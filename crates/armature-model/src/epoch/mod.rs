mod map;

pub use map::{EpochChanges, EpochCounter, EpochDeltaChanges, EpochMap};

/// Monotonically increasing change counter of a collection.
pub type Epoch = i64;
