use crate::mining::difficulty::validate_difficulty;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub consensus: ConsensusConfig,
    pub mining: MiningConfig,
    pub storage: StorageConfig,
}

/// Parameters fixed for the lifetime of one chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsensusConfig {
    /// Required leading zero hex digits in every block hash.
    pub difficulty: u32,
    /// Smallest total input value a transaction may spend.
    pub minimum_transaction_amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MiningConfig {
    pub threads: usize, // 0 = all cores
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub chain_file: String,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            difficulty: 5,
            minimum_transaction_amount: 1,
        }
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            timeout_secs: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: Config::home_dir().join(".pow-ledger"),
            chain_file: "chain.json".to_string(),
        }
    }
}

impl Config {
    /// Low difficulty for local experiments and tests.
    pub fn development() -> Self {
        Self {
            consensus: ConsensusConfig {
                difficulty: 2,
                minimum_transaction_amount: 1,
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_difficulty(self.consensus.difficulty)?;
        Ok(())
    }

    pub fn chain_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.chain_file)
    }

    /// Read `~/.pow-ledger/config.json`, falling back to defaults when it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::home_dir().join(".pow-ledger").join("config.json")
    }

    fn home_dir() -> PathBuf {
        PathBuf::from(env::var("HOME").unwrap_or_else(|_| ".".to_string()))
    }
}
