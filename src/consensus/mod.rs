//! Consensus rules: full-chain validation

pub mod validation;

pub use validation::{is_valid, ChainValidator};
