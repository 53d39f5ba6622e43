//! Proof-of-work search

pub mod miner;
pub mod difficulty;

pub use miner::{Miner, MiningResult};
pub use difficulty::{meets_difficulty, MAX_DIFFICULTY};
