//! Chain persistence

pub mod snapshot;

pub use snapshot::ChainSnapshot;
