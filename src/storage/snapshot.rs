use crate::core::{Block, Transaction};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything needed to rebuild a chain: its consensus parameters, the genesis
/// transaction and the ordered blocks. The UTXO set is not stored; it is
/// recovered by replaying the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub difficulty: u32,
    pub minimum_transaction_amount: u64,
    pub genesis_transaction: Transaction,
    pub blocks: Vec<Block>,
}

impl ChainSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_json()?)?;
        log::debug!("💾 Saved chain of {} blocks to {}", self.blocks.len(), path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = Self::from_json(&fs::read_to_string(path)?)?;

        log::debug!("Loaded chain of {} blocks from {}", snapshot.blocks.len(), path.display());
        Ok(snapshot)
    }
}
