use crate::config::ConsensusConfig;
use crate::consensus::validation::ChainValidator;
use crate::core::transaction::{Transaction, TxOutput};
use crate::core::utxo::UtxoSet;
use crate::core::Block;
use crate::crypto::hash::Hash256;
use crate::crypto::keys::PublicKey;
use crate::mining::{difficulty, Miner};
use crate::storage::ChainSnapshot;
use crate::{LedgerError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Everything one chain needs: the live UTXO set, the block sequence, the
/// transaction sequence counter and the consensus parameters.
///
/// Each context is independent; nothing is process-global. Transaction
/// application holds the UTXO write lock for its whole lookup-check-commit
/// cycle, so two transactions spending the same output never both succeed.
#[derive(Debug)]
pub struct LedgerContext {
    params: ConsensusConfig,
    utxo_set: RwLock<UtxoSet>,
    chain: RwLock<Vec<Block>>,
    genesis: RwLock<Option<Transaction>>,
    sequence: AtomicU64,
    miner: Miner,
}

impl LedgerContext {
    pub fn new(params: ConsensusConfig) -> Result<Self> {
        Self::with_miner(params, Miner::default())
    }

    pub fn with_miner(params: ConsensusConfig, miner: Miner) -> Result<Self> {
        difficulty::validate_difficulty(params.difficulty)?;

        Ok(Self {
            params,
            utxo_set: RwLock::new(UtxoSet::new()),
            chain: RwLock::new(Vec::new()),
            genesis: RwLock::new(None),
            sequence: AtomicU64::new(0),
            miner,
        })
    }

    pub fn params(&self) -> &ConsensusConfig {
        &self.params
    }

    pub fn difficulty(&self) -> u32 {
        self.params.difficulty
    }

    pub fn miner(&self) -> &Miner {
        &self.miner
    }

    /// Current value of the transaction sequence counter.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply the chain's coinbase transaction.
    ///
    /// Only the signature is checked: there are no inputs to resolve, and the
    /// single output to the recipient creates the chain's initial value.
    pub fn apply_genesis(&self, transaction: &mut Transaction) -> Result<()> {
        if !transaction.verify_signature()? {
            return Err(LedgerError::InvalidSignature);
        }

        let mut genesis = self.genesis.write()?;
        if genesis.is_some() {
            return Err(LedgerError::InvalidInput("Genesis transaction already applied".to_string()));
        }
        if !transaction.inputs.is_empty() {
            return Err(LedgerError::InvalidInput("Genesis transaction cannot spend inputs".to_string()));
        }

        let sequence = self.next_sequence();
        let id = transaction.compute_id(sequence);
        let output = TxOutput::new(transaction.recipient.clone(), transaction.amount, id, 0);

        self.utxo_set.write()?.insert(output.clone());

        transaction.id = Some(id);
        transaction.sequence = sequence;
        transaction.outputs = vec![output];
        *genesis = Some(transaction.clone());

        log::info!("Genesis transaction {} created {} units", id, transaction.amount);
        Ok(())
    }

    /// Validate `transaction` against the live UTXO set and apply it.
    ///
    /// Checks run in order: signature, input resolution, minimum amount, funds.
    /// On success the transaction receives its id, resolved inputs and outputs
    /// (recipient first, then change to the sender if any is left over). On
    /// failure neither the ledger nor `transaction` is modified.
    pub fn apply_transaction(&self, transaction: &mut Transaction) -> Result<Hash256> {
        if !transaction.verify_signature()? {
            return Err(LedgerError::InvalidSignature);
        }

        let mut utxo_set = self.utxo_set.write()?;

        let resolved = utxo_set.resolve_inputs(&transaction.inputs, &transaction.sender)?;
        let total = resolved
            .iter()
            .try_fold(0u64, |acc, output| acc.checked_add(output.amount))
            .ok_or(LedgerError::AmountOverflow)?;

        if total < self.params.minimum_transaction_amount {
            return Err(LedgerError::BelowMinimum {
                total,
                minimum: self.params.minimum_transaction_amount,
            });
        }

        let leftover = total.checked_sub(transaction.amount).ok_or(LedgerError::InsufficientFunds {
            required: transaction.amount,
            available: total,
        })?;

        let sequence = self.next_sequence();
        let id = transaction.compute_id(sequence);

        let mut outputs = vec![TxOutput::new(transaction.recipient.clone(), transaction.amount, id, 0)];
        if leftover > 0 {
            outputs.push(TxOutput::new(transaction.sender.clone(), leftover, id, 1));
        }

        utxo_set.commit(&resolved, &outputs);
        drop(utxo_set);

        for (input, output) in transaction.inputs.iter_mut().zip(resolved) {
            input.resolved = Some(output);
        }
        transaction.id = Some(id);
        transaction.sequence = sequence;
        transaction.outputs = outputs;

        log::debug!(
            "Applied transaction {}: {} units, {} input(s), change {}",
            id, transaction.amount, transaction.inputs.len(), leftover
        );
        Ok(id)
    }

    /// Mine `block` at the chain difficulty and append a copy of it.
    ///
    /// The block must build on the current tip, or be a genesis block for an
    /// empty chain. Mining runs without holding the chain lock; the link is
    /// checked again before the block is appended.
    ///
    /// The block's transactions are already applied to the live ledger by
    /// [`Block::add_transaction`], so on failure the caller still owns the
    /// block and should retry with it: after `MiningCancelled` reset the miner,
    /// after `MiningTimedOut` simply call again, since the search continues
    /// from the first nonce not yet tried.
    pub fn add_block(&self, block: &mut Block) -> Result<Hash256> {
        self.check_link(block)?;

        self.miner.mine(block, self.params.difficulty)?;

        let mut chain = self.chain.write()?;
        let height = chain.len();
        if !Self::links_to(&chain, block) {
            return Err(LedgerError::ChainBreak { height });
        }
        chain.push(block.clone());

        log::info!("Block {} added to chain: {}", height, block.hash);
        Ok(block.hash)
    }

    fn check_link(&self, block: &Block) -> Result<()> {
        let chain = self.chain.read()?;
        if !Self::links_to(&chain, block) {
            return Err(LedgerError::ChainBreak { height: chain.len() });
        }
        Ok(())
    }

    fn links_to(chain: &[Block], block: &Block) -> bool {
        match chain.last() {
            Some(tip) => block.header.previous_hash == tip.hash,
            None => block.is_genesis(),
        }
    }

    pub fn blocks(&self) -> Result<Vec<Block>> {
        Ok(self.chain.read()?.clone())
    }

    pub fn block(&self, height: usize) -> Result<Option<Block>> {
        Ok(self.chain.read()?.get(height).cloned())
    }

    pub fn height(&self) -> Result<usize> {
        Ok(self.chain.read()?.len())
    }

    /// Hash of the last block, or the zero hash for an empty chain.
    pub fn tip_hash(&self) -> Result<Hash256> {
        let chain = self.chain.read()?;
        Ok(chain.last().map(|block| block.hash).unwrap_or_else(Hash256::zero))
    }

    pub fn genesis_transaction(&self) -> Result<Option<Transaction>> {
        Ok(self.genesis.read()?.clone())
    }

    pub fn utxo(&self, id: &Hash256) -> Result<Option<TxOutput>> {
        Ok(self.utxo_set.read()?.get(id).cloned())
    }

    pub fn utxo_count(&self) -> Result<usize> {
        Ok(self.utxo_set.read()?.len())
    }

    pub fn balance_of(&self, key: &PublicKey) -> Result<u64> {
        self.utxo_set.read()?.balance(key)
    }

    pub fn spendable_outputs(&self, key: &PublicKey) -> Result<Vec<TxOutput>> {
        Ok(self.utxo_set.read()?.outputs_for(key))
    }

    pub fn find_spendable_outputs(&self, key: &PublicKey, amount: u64) -> Result<(u64, Vec<TxOutput>)> {
        self.utxo_set.read()?.find_spendable_outputs(key, amount)
    }

    /// Replay the whole chain from the genesis transaction.
    pub fn validate(&self) -> Result<()> {
        let genesis = self.genesis_transaction()?
            .ok_or_else(|| LedgerError::InvalidInput("Chain has no genesis transaction".to_string()))?;
        let chain = self.chain.read()?;

        ChainValidator::new(self.params.difficulty).validate_chain(&chain, &genesis)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn snapshot(&self) -> Result<ChainSnapshot> {
        let genesis_transaction = self.genesis_transaction()?
            .ok_or_else(|| LedgerError::InvalidInput("Chain has no genesis transaction".to_string()))?;

        Ok(ChainSnapshot {
            difficulty: self.params.difficulty,
            minimum_transaction_amount: self.params.minimum_transaction_amount,
            genesis_transaction,
            blocks: self.blocks()?,
        })
    }

    /// Rebuild a context from a stored chain.
    ///
    /// The chain is fully validated; the validator's final UTXO view becomes
    /// the live ledger and the sequence counter resumes after the highest
    /// sequence recorded in the chain.
    pub fn restore(snapshot: ChainSnapshot, miner: Miner) -> Result<Self> {
        let params = ConsensusConfig {
            difficulty: snapshot.difficulty,
            minimum_transaction_amount: snapshot.minimum_transaction_amount,
        };
        let context = Self::with_miner(params, miner)?;

        let utxo_set = ChainValidator::new(params.difficulty)
            .replay(&snapshot.blocks, &snapshot.genesis_transaction)?;

        let last_sequence = snapshot.blocks
            .iter()
            .flat_map(|block| block.transactions.iter())
            .chain(std::iter::once(&snapshot.genesis_transaction))
            .map(|tx| tx.sequence)
            .max()
            .unwrap_or(0);

        *context.utxo_set.write()? = utxo_set;
        *context.chain.write()? = snapshot.blocks;
        *context.genesis.write()? = Some(snapshot.genesis_transaction);
        context.sequence.store(last_sequence, Ordering::SeqCst);

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TxInput;
    use crate::crypto::keys::KeyPair;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::{Duration, Instant};

    fn params(difficulty: u32) -> ConsensusConfig {
        ConsensusConfig { difficulty, minimum_transaction_amount: 1 }
    }

    /// Context whose genesis gives `owner` 100 units.
    fn funded(owner: &KeyPair) -> Result<(LedgerContext, TxOutput)> {
        let context = LedgerContext::new(params(1))?;
        let coinbase = KeyPair::generate()?;

        let mut genesis = Transaction::new(coinbase.public_key.clone(), owner.public_key.clone(), 100, vec![]);
        genesis.sign(&coinbase.private_key)?;
        context.apply_genesis(&mut genesis)?;

        let output = genesis.outputs[0].clone();
        Ok((context, output))
    }

    fn spend(from: &KeyPair, to: &PublicKey, amount: u64, inputs: &[Hash256]) -> Result<Transaction> {
        let inputs = inputs.iter().map(|id| TxInput::new(*id)).collect();
        let mut tx = Transaction::new(from.public_key.clone(), to.clone(), amount, inputs);
        tx.sign(&from.private_key)?;
        Ok(tx)
    }

    #[test]
    fn test_genesis_creates_value() -> Result<()> {
        let alice = KeyPair::generate()?;
        let (context, output) = funded(&alice)?;

        assert_eq!(context.balance_of(&alice.public_key)?, 100);
        assert_eq!(context.utxo(&output.id)?, Some(output.clone()));
        assert_eq!(context.sequence(), 1);

        let genesis = context.genesis_transaction()?.unwrap();
        assert_eq!(genesis.id, Some(output.origin_tx));

        Ok(())
    }

    #[test]
    fn test_second_genesis_rejected() -> Result<()> {
        let alice = KeyPair::generate()?;
        let (context, _) = funded(&alice)?;

        let mut again = Transaction::new(alice.public_key.clone(), alice.public_key.clone(), 5, vec![]);
        again.sign(&alice.private_key)?;
        assert!(matches!(context.apply_genesis(&mut again), Err(LedgerError::InvalidInput(_))));

        Ok(())
    }

    #[test]
    fn test_apply_with_change() -> Result<()> {
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;
        let (context, funding) = funded(&alice)?;

        let mut tx = spend(&alice, &bob.public_key, 20, &[funding.id])?;
        let id = context.apply_transaction(&mut tx)?;

        assert_eq!(tx.id, Some(id));
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[0].recipient, bob.public_key);
        assert_eq!(tx.outputs[0].amount, 20);
        assert_eq!(tx.outputs[1].recipient, alice.public_key);
        assert_eq!(tx.outputs[1].amount, 80);
        assert_eq!(tx.inputs[0].resolved, Some(funding.clone()));
        assert_eq!(tx.total_input_value()?, tx.total_output_value()?);

        assert_eq!(context.balance_of(&alice.public_key)?, 80);
        assert_eq!(context.balance_of(&bob.public_key)?, 20);
        assert!(context.utxo(&funding.id)?.is_none());

        Ok(())
    }

    #[test]
    fn test_exact_spend_has_no_change() -> Result<()> {
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;
        let (context, funding) = funded(&alice)?;

        let mut tx = spend(&alice, &bob.public_key, 100, &[funding.id])?;
        context.apply_transaction(&mut tx)?;

        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(context.balance_of(&alice.public_key)?, 0);
        assert_eq!(context.balance_of(&bob.public_key)?, 100);

        Ok(())
    }

    #[test]
    fn test_reapply_fails_with_missing_output() -> Result<()> {
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;
        let (context, funding) = funded(&alice)?;

        let mut tx = spend(&alice, &bob.public_key, 20, &[funding.id])?;
        context.apply_transaction(&mut tx)?;
        let applied = tx.clone();

        let result = context.apply_transaction(&mut tx);
        assert!(matches!(result, Err(LedgerError::MissingOutput(id)) if id == funding.id));
        assert_eq!(tx, applied);
        assert_eq!(context.balance_of(&bob.public_key)?, 20);

        Ok(())
    }

    #[test]
    fn test_rejections_leave_ledger_untouched() -> Result<()> {
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;
        let (context, funding) = funded(&alice)?;
        let sequence = context.sequence();

        // Bad signature
        let mut forged = spend(&alice, &bob.public_key, 20, &[funding.id])?;
        forged.amount = 90;
        assert!(matches!(context.apply_transaction(&mut forged), Err(LedgerError::InvalidSignature)));

        // Unknown input
        let mut dangling = spend(&alice, &bob.public_key, 20, &[Hash256::hash(b"nowhere")])?;
        assert!(matches!(context.apply_transaction(&mut dangling), Err(LedgerError::MissingOutput(_))));

        // Overspend
        let mut greedy = spend(&alice, &bob.public_key, 150, &[funding.id])?;
        assert!(matches!(
            context.apply_transaction(&mut greedy),
            Err(LedgerError::InsufficientFunds { required: 150, available: 100 })
        ));

        // Someone else's output
        let mut theft = spend(&bob, &bob.public_key, 10, &[funding.id])?;
        assert!(matches!(context.apply_transaction(&mut theft), Err(LedgerError::ForeignInput(_))));

        assert_eq!(context.sequence(), sequence);
        assert_eq!(context.balance_of(&alice.public_key)?, 100);
        assert_eq!(context.utxo_count()?, 1);
        assert!(greedy.id.is_none() && greedy.outputs.is_empty());

        Ok(())
    }

    #[test]
    fn test_below_minimum() -> Result<()> {
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;
        let context = LedgerContext::new(ConsensusConfig { difficulty: 0, minimum_transaction_amount: 10 })?;

        let mut genesis = Transaction::new(bob.public_key.clone(), alice.public_key.clone(), 5, vec![]);
        genesis.sign(&bob.private_key)?;
        context.apply_genesis(&mut genesis)?;

        let mut tx = spend(&alice, &bob.public_key, 5, &[genesis.outputs[0].id])?;
        assert!(matches!(
            context.apply_transaction(&mut tx),
            Err(LedgerError::BelowMinimum { total: 5, minimum: 10 })
        ));

        // No inputs at all sums to zero
        let mut empty = spend(&alice, &bob.public_key, 0, &[])?;
        assert!(matches!(context.apply_transaction(&mut empty), Err(LedgerError::BelowMinimum { total: 0, .. })));

        Ok(())
    }

    #[test]
    fn test_sequential_double_spend() -> Result<()> {
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;
        let carol = KeyPair::generate()?;
        let (context, funding) = funded(&alice)?;

        let mut to_bob = spend(&alice, &bob.public_key, 50, &[funding.id])?;
        let mut to_carol = spend(&alice, &carol.public_key, 50, &[funding.id])?;

        assert!(context.apply_transaction(&mut to_bob).is_ok());
        assert!(matches!(context.apply_transaction(&mut to_carol), Err(LedgerError::MissingOutput(_))));
        assert_eq!(context.balance_of(&carol.public_key)?, 0);

        Ok(())
    }

    #[test]
    fn test_concurrent_double_spend() -> Result<()> {
        let alice = KeyPair::generate()?;
        let (context, funding) = funded(&alice)?;
        let context = Arc::new(context);

        const RACERS: usize = 8;
        let barrier = Arc::new(Barrier::new(RACERS));
        let mut handles = Vec::new();

        for _ in 0..RACERS {
            let recipient = KeyPair::generate()?.public_key;
            let mut tx = spend(&alice, &recipient, 30, &[funding.id])?;
            let context = context.clone();
            let barrier = barrier.clone();

            handles.push(thread::spawn(move || {
                barrier.wait();
                context.apply_transaction(&mut tx)
            }));
        }

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(LedgerError::MissingOutput(_))))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(losers, RACERS - 1);
        assert_eq!(context.balance_of(&alice.public_key)?, 70);

        Ok(())
    }

    #[test]
    fn test_independent_contexts() -> Result<()> {
        let alice = KeyPair::generate()?;
        let (first, _) = funded(&alice)?;
        let (second, _) = funded(&alice)?;

        assert_eq!(first.balance_of(&alice.public_key)?, 100);
        assert_eq!(second.balance_of(&alice.public_key)?, 100);
        assert_eq!(first.sequence(), 1);
        assert_eq!(second.sequence(), 1);

        Ok(())
    }

    #[test]
    fn test_add_block_requires_link() -> Result<()> {
        let context = LedgerContext::new(params(1))?;

        let mut orphan = Block::new(Hash256::hash(b"elsewhere"));
        assert!(matches!(context.add_block(&mut orphan), Err(LedgerError::ChainBreak { height: 0 })));

        let genesis_hash = context.add_block(&mut Block::new(Hash256::zero()))?;
        assert_eq!(context.tip_hash()?, genesis_hash);

        let mut stale = Block::new(Hash256::zero());
        assert!(matches!(context.add_block(&mut stale), Err(LedgerError::ChainBreak { height: 1 })));

        context.add_block(&mut Block::new(genesis_hash))?;
        assert_eq!(context.height()?, 2);
        assert!(context.block(1)?.unwrap().meets_difficulty(1));

        Ok(())
    }

    #[test]
    fn test_two_party_scenario() -> Result<()> {
        let context = LedgerContext::with_miner(params(5), Miner::new(0))?;
        let coinbase = KeyPair::generate()?;
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;

        let mut genesis_tx = Transaction::new(coinbase.public_key.clone(), alice.public_key.clone(), 100, vec![]);
        genesis_tx.sign(&coinbase.private_key)?;
        context.apply_genesis(&mut genesis_tx)?;

        let mut genesis = Block::new(Hash256::zero());
        genesis.add_transaction(genesis_tx.clone(), &context)?;
        let genesis_hash = context.add_block(&mut genesis)?;

        let payment = spend(&alice, &bob.public_key, 20, &[genesis_tx.outputs[0].id])?;
        let mut block = Block::new(genesis_hash);
        block.add_transaction(payment, &context)?;
        context.add_block(&mut block)?;

        assert_eq!(context.balance_of(&alice.public_key)?, 80);
        assert_eq!(context.balance_of(&bob.public_key)?, 20);
        assert!(context.blocks()?.iter().all(|b| b.hash.to_hex().starts_with("00000")));
        assert!(context.is_valid());

        Ok(())
    }

    #[test]
    fn test_rejected_transaction_leaves_block_unchanged() -> Result<()> {
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;
        let (context, _) = funded(&alice)?;

        let mut block = Block::new(Hash256::hash(b"parent"));
        let bogus = spend(&alice, &bob.public_key, 10, &[Hash256::hash(b"nothing")])?;

        assert!(block.add_transaction(bogus, &context).is_err());
        assert_eq!(block.transaction_count(), 0);

        Ok(())
    }

    #[test]
    fn test_self_send_keeps_both_outputs() -> Result<()> {
        let alice = KeyPair::generate()?;
        let (context, funding) = funded(&alice)?;

        let mut tx = spend(&alice, &alice.public_key, 50, &[funding.id])?;
        context.apply_transaction(&mut tx)?;

        assert_eq!(tx.outputs.len(), 2);
        assert_ne!(tx.outputs[0].id, tx.outputs[1].id);
        assert_eq!(context.utxo_count()?, 2);
        assert_eq!(context.balance_of(&alice.public_key)?, 100);

        Ok(())
    }

    #[test]
    fn test_add_block_recovers_after_cancel() -> Result<()> {
        let alice = KeyPair::generate()?;
        let bob = KeyPair::generate()?;
        let (context, funding) = funded(&alice)?;

        let mut genesis = Block::new(Hash256::zero());
        genesis.add_transaction(context.genesis_transaction()?.unwrap(), &context)?;
        context.add_block(&mut genesis)?;

        let mut block = Block::new(genesis.hash);
        block.add_transaction(spend(&alice, &bob.public_key, 20, &[funding.id])?, &context)?;

        context.miner().cancel();
        assert!(matches!(context.add_block(&mut block), Err(LedgerError::MiningCancelled)));
        assert_eq!(context.height()?, 1);
        assert_eq!(block.transaction_count(), 1);
        assert_eq!(context.balance_of(&bob.public_key)?, 20);

        // The caller still holds the block and can append it once mining resumes
        context.miner().reset();
        context.add_block(&mut block)?;
        assert_eq!(context.height()?, 2);
        assert!(context.is_valid());

        Ok(())
    }

    #[test]
    fn test_timed_out_block_is_kept() -> Result<()> {
        let miner = Miner::new(1).with_timeout(Duration::from_millis(10));
        let context = LedgerContext::with_miner(params(20), miner)?;

        let mut block = Block::new(Hash256::zero());
        assert!(matches!(context.add_block(&mut block), Err(LedgerError::MiningTimedOut { .. })));
        assert_eq!(context.height()?, 0);
        assert!(block.is_genesis());
        assert_eq!(block.hash, block.calculate_hash());

        Ok(())
    }

    #[test]
    fn test_chain_readable_while_mining() -> Result<()> {
        let miner = Miner::new(1).with_timeout(Duration::from_millis(400));
        let context = Arc::new(LedgerContext::with_miner(params(20), miner)?);

        let worker = {
            let context = context.clone();
            thread::spawn(move || context.add_block(&mut Block::new(Hash256::zero())))
        };

        thread::sleep(Duration::from_millis(50));
        let started = Instant::now();
        assert_eq!(context.height()?, 0);
        assert_eq!(context.tip_hash()?, Hash256::zero());
        assert!(started.elapsed() < Duration::from_millis(200));

        assert!(matches!(worker.join().unwrap(), Err(LedgerError::MiningTimedOut { .. })));

        Ok(())
    }

    #[test]
    fn test_invalid_difficulty_rejected() {
        assert!(matches!(
            LedgerContext::new(params(99)),
            Err(LedgerError::InvalidDifficulty(99))
        ));
    }
}
