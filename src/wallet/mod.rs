//! Key-holding wallet that builds and signs transfers

pub mod wallet;

pub use wallet::Wallet;
