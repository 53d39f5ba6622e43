use crate::crypto::hash::Hash256;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid signature")]
    InvalidSignature,
    
    #[error("Referenced output {0} is not in the UTXO set")]
    MissingOutput(Hash256),
    
    #[error("Input value {total} is below the minimum transaction amount {minimum}")]
    BelowMinimum { total: u64, minimum: u64 },
    
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },
    
    #[error("Hash mismatch in block {height}: {what}")]
    HashMismatch { height: usize, what: String },
    
    #[error("Block {height} does not link to the previous block hash")]
    ChainBreak { height: usize },
    
    #[error("Block {height} hash does not meet difficulty {difficulty}")]
    DifficultyNotMet { height: usize, difficulty: u32 },
    
    #[error("Input {0} does not resolve to an unspent output")]
    DanglingInput(Hash256),
    
    #[error("Input {output_id} records amount {recorded}, UTXO holds {actual}")]
    AmountMismatch { output_id: Hash256, recorded: u64, actual: u64 },
    
    #[error("Output {index} is not routed to the expected key")]
    OutputMisrouted { index: usize },
    
    #[error("Output {index} carries {actual}, expected {expected}")]
    OutputAmountMismatch { index: usize, expected: u64, actual: u64 },
    
    #[error("Inputs total {inputs} but outputs total {outputs}")]
    ValueNotConserved { inputs: u64, outputs: u64 },
    
    #[error("Input {0} is not owned by the sender")]
    ForeignInput(Hash256),
    
    #[error("Mining cancelled")]
    MiningCancelled,
    
    #[error("Mining timed out after {attempts} attempts")]
    MiningTimedOut { attempts: u64 },
    
    #[error("Invalid difficulty {0}: at most 64 leading hex zeros are possible")]
    InvalidDifficulty(u32),
    
    #[error("Amount overflow")]
    AmountOverflow,
    
    #[error("Crypto error: {0}")]
    Crypto(String),
    
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    
    #[error("Ledger lock poisoned")]
    LockPoisoned,
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<secp256k1::Error> for LedgerError {
    fn from(err: secp256k1::Error) -> Self {
        LedgerError::Crypto(format!("secp256k1 error: {}", err))
    }
}

impl<T> From<std::sync::PoisonError<T>> for LedgerError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        LedgerError::LockPoisoned
    }
}
