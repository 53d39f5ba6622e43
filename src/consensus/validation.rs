use crate::core::{Block, Transaction, UtxoSet};
use crate::crypto::hash::Hash256;
use crate::mining::difficulty;
use crate::{LedgerError, Result};

/// Full-chain validator.
///
/// Replays every transaction against a private UTXO view seeded from the
/// genesis transaction. The live ledger is never consulted or modified, and the
/// first violation ends the run.
#[derive(Debug, Clone)]
pub struct ChainValidator {
    difficulty: u32,
}

impl ChainValidator {
    pub fn new(difficulty: u32) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Validate the chain and return the UTXO view it produces.
    pub fn replay(&self, chain: &[Block], genesis: &Transaction) -> Result<UtxoSet> {
        difficulty::validate_difficulty(self.difficulty)?;
        log::debug!("Validating chain of {} blocks at difficulty {}", chain.len(), self.difficulty);

        let mut view = UtxoSet::new();
        self.seed_genesis(chain, genesis, &mut view).map_err(|e| {
            log::warn!("❌ Genesis transaction rejected: {}", e);
            e
        })?;

        for (height, block) in chain.iter().enumerate() {
            let previous = height.checked_sub(1).map(|i| &chain[i]);

            self.validate_block_header(block, previous, height).map_err(|e| {
                log::warn!("❌ Block {} rejected: {}", height, e);
                e
            })?;

            // The genesis block only carries the already-seeded coinbase
            if height == 0 {
                continue;
            }

            for (index, tx) in block.transactions.iter().enumerate() {
                self.validate_transaction(tx, height, &mut view).map_err(|e| {
                    log::warn!("❌ Transaction {} in block {} rejected: {}", index, height, e);
                    e
                })?;
            }
        }

        log::info!("✅ Chain validation successful");
        Ok(view)
    }

    pub fn validate_chain(&self, chain: &[Block], genesis: &Transaction) -> Result<()> {
        self.replay(chain, genesis).map(|_| ())
    }

    pub fn is_valid(&self, chain: &[Block], genesis: &Transaction) -> bool {
        self.validate_chain(chain, genesis).is_ok()
    }

    /// Check the genesis transaction and add its single output to `view`.
    ///
    /// A non-empty chain must carry exactly this transaction in block 0.
    fn seed_genesis(&self, chain: &[Block], genesis: &Transaction, view: &mut UtxoSet) -> Result<()> {
        if !genesis.verify_signature()? {
            return Err(LedgerError::InvalidSignature);
        }
        if !genesis.inputs.is_empty() {
            return Err(LedgerError::InvalidInput("Genesis transaction cannot spend inputs".to_string()));
        }

        let id = genesis.id.ok_or_else(|| LedgerError::HashMismatch {
            height: 0,
            what: "missing genesis transaction id".to_string(),
        })?;
        if genesis.compute_id(genesis.sequence) != id {
            return Err(LedgerError::HashMismatch {
                height: 0,
                what: format!("genesis transaction id {}", id),
            });
        }

        let primary = match genesis.outputs.as_slice() {
            [primary] => primary,
            outputs => return Err(LedgerError::OutputMisrouted { index: outputs.len().min(1) }),
        };
        self.check_output_ids(genesis, id, 0)?;
        if primary.recipient != genesis.recipient {
            return Err(LedgerError::OutputMisrouted { index: 0 });
        }
        if primary.amount != genesis.amount {
            return Err(LedgerError::OutputAmountMismatch {
                index: 0,
                expected: genesis.amount,
                actual: primary.amount,
            });
        }

        if let Some(first) = chain.first() {
            if first.transactions.as_slice() != std::slice::from_ref(genesis) {
                return Err(LedgerError::HashMismatch {
                    height: 0,
                    what: "genesis block does not carry the genesis transaction".to_string(),
                });
            }
        }

        view.insert(primary.clone());
        Ok(())
    }

    /// Every output commits to its fields, names `tx_id` as its origin and sits
    /// at the position it records.
    fn check_output_ids(&self, tx: &Transaction, tx_id: Hash256, height: usize) -> Result<()> {
        for (position, output) in tx.outputs.iter().enumerate() {
            if !output.id_is_consistent() || output.origin_tx != tx_id || output.index as usize != position {
                return Err(LedgerError::HashMismatch {
                    height,
                    what: format!("output id {}", output.id),
                });
            }
        }
        Ok(())
    }

    /// Outputs must be exactly what applying the transaction produces: the
    /// amount to the recipient, then the change to the sender when any is left.
    fn check_output_layout(tx: &Transaction, inputs: u64) -> Result<()> {
        let change = inputs.checked_sub(tx.amount).ok_or(LedgerError::InsufficientFunds {
            required: tx.amount,
            available: inputs,
        })?;
        let expected_len = if change > 0 { 2 } else { 1 };

        if tx.outputs.len() != expected_len {
            return Err(LedgerError::OutputMisrouted {
                index: tx.outputs.len().min(expected_len),
            });
        }

        let expected = [(&tx.recipient, tx.amount), (&tx.sender, change)];
        for (index, (output, (recipient, amount))) in tx.outputs.iter().zip(expected).enumerate() {
            if &output.recipient != recipient {
                return Err(LedgerError::OutputMisrouted { index });
            }
            if output.amount != amount {
                return Err(LedgerError::OutputAmountMismatch {
                    index,
                    expected: amount,
                    actual: output.amount,
                });
            }
        }

        Ok(())
    }

    /// Hash, link, difficulty and Merkle root of one block.
    fn validate_block_header(&self, block: &Block, previous: Option<&Block>, height: usize) -> Result<()> {
        if block.calculate_hash() != block.hash {
            return Err(LedgerError::HashMismatch {
                height,
                what: "block hash".to_string(),
            });
        }

        if let Some(previous) = previous {
            if block.header.previous_hash != previous.hash {
                return Err(LedgerError::ChainBreak { height });
            }
        }

        if !difficulty::meets_difficulty(&block.hash, self.difficulty) {
            return Err(LedgerError::DifficultyNotMet {
                height,
                difficulty: self.difficulty,
            });
        }

        if Block::calculate_merkle_root(&block.transactions) != block.header.merkle_root {
            return Err(LedgerError::HashMismatch {
                height,
                what: "merkle root".to_string(),
            });
        }

        Ok(())
    }

    fn validate_transaction(&self, tx: &Transaction, height: usize, view: &mut UtxoSet) -> Result<()> {
        let recorded_id = tx.id.ok_or_else(|| LedgerError::HashMismatch {
            height,
            what: "missing transaction id".to_string(),
        })?;
        if tx.compute_id(tx.sequence) != recorded_id {
            return Err(LedgerError::HashMismatch {
                height,
                what: format!("transaction id {}", recorded_id),
            });
        }

        if !tx.verify_signature()? {
            return Err(LedgerError::InvalidSignature);
        }

        let inputs = tx.total_input_value()?;
        let outputs = tx.total_output_value()?;
        if inputs != outputs {
            return Err(LedgerError::ValueNotConserved { inputs, outputs });
        }

        for input in &tx.inputs {
            // Removing as we go also catches an output referenced twice
            let live = view.remove(&input.output_id)
                .ok_or(LedgerError::DanglingInput(input.output_id))?;
            let recorded = input.resolved.as_ref()
                .ok_or(LedgerError::DanglingInput(input.output_id))?;

            if recorded.amount != live.amount {
                return Err(LedgerError::AmountMismatch {
                    output_id: input.output_id,
                    recorded: recorded.amount,
                    actual: live.amount,
                });
            }

            if !live.is_owned_by(&tx.sender) {
                return Err(LedgerError::ForeignInput(input.output_id));
            }
        }

        self.check_output_ids(tx, recorded_id, height)?;
        Self::check_output_layout(tx, inputs)?;

        for output in &tx.outputs {
            view.insert(output.clone());
        }

        Ok(())
    }
}

/// Replay `chain` from `genesis` at `difficulty` and report whether it holds.
pub fn is_valid(chain: &[Block], genesis: &Transaction, difficulty: u32) -> bool {
    ChainValidator::new(difficulty).is_valid(chain, genesis)
}

/// Tip hash of a chain, zero when empty.
pub fn chain_tip(chain: &[Block]) -> Hash256 {
    chain.last().map(|block| block.hash).unwrap_or_else(Hash256::zero)
}
