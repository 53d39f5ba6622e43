use crate::core::ledger::LedgerContext;
use crate::core::Transaction;
use crate::crypto::hash::{Hash256, Hashable};
use crate::mining::{difficulty, Miner, MiningResult};
use crate::{LedgerError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: Hash256,
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub previous_hash: Hash256,
    pub merkle_root: Hash256,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub nonce: u64,
}

impl Block {
    /// Empty block on top of `previous_hash`. Pass `Hash256::zero()` for genesis.
    pub fn new(previous_hash: Hash256) -> Self {
        Self::with_timestamp(previous_hash, Utc::now().timestamp_millis())
    }

    pub fn with_timestamp(previous_hash: Hash256, timestamp: i64) -> Self {
        let header = BlockHeader {
            previous_hash,
            merkle_root: merkle_root(&[]),
            timestamp,
            nonce: 0,
        };

        Self {
            hash: header.hash(),
            header,
            transactions: Vec::new(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.header.previous_hash.is_zero()
    }

    pub fn calculate_hash(&self) -> Hash256 {
        self.header.hash()
    }

    pub fn calculate_merkle_root(transactions: &[Transaction]) -> Hash256 {
        let ids: Vec<Hash256> = transactions.iter().map(|tx| tx.hash()).collect();
        merkle_root(&ids)
    }

    /// Recompute the Merkle root over the current transactions and refresh the hash.
    pub fn update_merkle_root(&mut self) {
        self.header.merkle_root = Self::calculate_merkle_root(&self.transactions);
        self.hash = self.calculate_hash();
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.header.nonce = nonce;
        self.hash = self.calculate_hash();
    }

    /// Append a transaction.
    ///
    /// Outside the genesis block the transaction is applied to `ledger` first and
    /// is only appended if that succeeds. A rejected transaction leaves both the
    /// block and the ledger untouched.
    pub fn add_transaction(&mut self, mut transaction: Transaction, ledger: &LedgerContext) -> Result<()> {
        if self.is_genesis() {
            if !transaction.is_applied() {
                return Err(LedgerError::InvalidInput(
                    "Genesis transaction must be applied with apply_genesis first".to_string()
                ));
            }
        } else if let Err(e) = ledger.apply_transaction(&mut transaction) {
            log::warn!("Transaction rejected from block: {}", e);
            return Err(e);
        }

        self.transactions.push(transaction);
        Ok(())
    }

    /// Mine on the calling thread with no timeout.
    pub fn mine(&mut self, difficulty: u32) -> Result<MiningResult> {
        Miner::new(1).mine(self, difficulty)
    }

    /// Stored hash is current and meets `difficulty`.
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        self.hash == self.calculate_hash() && difficulty::meets_difficulty(&self.hash, difficulty)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn contains_transaction(&self, tx_id: &Hash256) -> bool {
        self.transactions.iter().any(|tx| tx.id.as_ref() == Some(tx_id))
    }
}

impl Hashable for Block {
    fn hash(&self) -> Hash256 {
        self.header.hash()
    }
}

impl BlockHeader {
    pub fn hash_with_nonce(&self, nonce: u64) -> Hash256 {
        Hash256::hash_parts(&[
            self.previous_hash.as_bytes().as_slice(),
            self.merkle_root.as_bytes().as_slice(),
            self.timestamp.to_le_bytes().as_slice(),
            nonce.to_le_bytes().as_slice(),
        ])
    }
}

impl Hashable for BlockHeader {
    fn hash(&self) -> Hash256 {
        self.hash_with_nonce(self.nonce)
    }
}

/// Pairwise reduction of transaction ids to a single commitment.
///
/// No ids gives the zero hash and a single id is returned unchanged. An odd
/// layer pairs its last element with itself.
pub fn merkle_root(ids: &[Hash256]) -> Hash256 {
    match ids {
        [] => return Hash256::zero(),
        [only] => return *only,
        _ => {}
    }

    let mut layer = ids.to_vec();

    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                Hash256::hash_parts(&[left.as_bytes().as_slice(), right.as_bytes().as_slice()])
            })
            .collect();
    }

    layer[0]
}
