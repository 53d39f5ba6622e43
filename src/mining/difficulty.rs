use crate::crypto::hash::Hash256;
use crate::{LedgerError, Result};

/// A SHA-256 digest has 64 hex digits.
pub const MAX_DIFFICULTY: u32 = 64;

/// True when the hex rendering of `hash` starts with `difficulty` zeros.
pub fn meets_difficulty(hash: &Hash256, difficulty: u32) -> bool {
    hash.leading_zero_nibbles() >= difficulty
}

pub fn validate_difficulty(difficulty: u32) -> Result<()> {
    if difficulty > MAX_DIFFICULTY {
        return Err(LedgerError::InvalidDifficulty(difficulty));
    }
    Ok(())
}

/// The hex prefix a block hash must start with.
pub fn target_prefix(difficulty: u32) -> String {
    "0".repeat(difficulty as usize)
}

/// Mean number of hashes needed to hit the target; each hex digit is 1-in-16.
pub fn expected_attempts(difficulty: u32) -> f64 {
    16f64.powi(difficulty as i32)
}
