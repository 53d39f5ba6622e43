//! Core ledger components

pub mod block;
pub mod ledger;
pub mod transaction;
pub mod utxo;

pub use block::{merkle_root, Block, BlockHeader};
pub use ledger::LedgerContext;
pub use transaction::{Transaction, TxInput, TxOutput};
pub use utxo::UtxoSet;
