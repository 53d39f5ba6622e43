//! pow-ledger: a proof-of-work UTXO ledger
//!
//! - UTXO transactions signed with secp256k1 ECDSA
//! - Blocks committed by a Merkle root and mined to a leading-zero target
//! - Full-chain replay validation against a private UTXO view
//! - JSON chain snapshots and a small CLI

pub mod core;
pub mod crypto;
pub mod wallet;
pub mod mining;
pub mod storage;
pub mod cli;
pub mod consensus;
pub mod error;
pub mod config;

pub use error::{LedgerError, Result};
