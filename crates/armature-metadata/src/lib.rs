pub mod poseidon;
pub mod university;

mod context;

pub use context::{Context, PoseidonStore, SharedContext, UniversityStore};
