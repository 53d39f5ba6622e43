use crate::core::transaction::{TxInput, TxOutput};
use crate::crypto::hash::Hash256;
use crate::crypto::keys::PublicKey;
use crate::{LedgerError, Result};
use std::collections::{HashMap, HashSet};

/// Unspent outputs keyed by output id. Entries are created by outputs and
/// deleted when spent; they are never modified in place.
#[derive(Debug, Clone, Default)]
pub struct UtxoSet {
    entries: HashMap<Hash256, TxOutput>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, output: TxOutput) {
        self.entries.insert(output.id, output);
    }

    pub fn remove(&mut self, id: &Hash256) -> Option<TxOutput> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &Hash256) -> Option<&TxOutput> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &Hash256) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TxOutput> {
        self.entries.values()
    }

    /// Look up every input, in order, against the set.
    ///
    /// Fails with `MissingOutput` for an unknown id or an id referenced twice,
    /// and with `ForeignInput` when an output does not belong to `owner`.
    pub fn resolve_inputs(&self, inputs: &[TxInput], owner: &PublicKey) -> Result<Vec<TxOutput>> {
        let mut seen = HashSet::with_capacity(inputs.len());
        let mut resolved = Vec::with_capacity(inputs.len());

        for input in inputs {
            if !seen.insert(input.output_id) {
                return Err(LedgerError::MissingOutput(input.output_id));
            }

            let output = self.get(&input.output_id)
                .ok_or(LedgerError::MissingOutput(input.output_id))?;

            if !output.is_owned_by(owner) {
                return Err(LedgerError::ForeignInput(input.output_id));
            }

            resolved.push(output.clone());
        }

        Ok(resolved)
    }

    /// Insert `created` and delete `spent`. Callers must have resolved `spent`
    /// against this set under the same lock, so the update cannot half-apply.
    pub fn commit(&mut self, spent: &[TxOutput], created: &[TxOutput]) {
        for output in created {
            self.insert(output.clone());
        }
        for output in spent {
            self.remove(&output.id);
        }
    }

    pub fn outputs_for(&self, key: &PublicKey) -> Vec<TxOutput> {
        let mut outputs: Vec<TxOutput> = self.entries
            .values()
            .filter(|output| output.is_owned_by(key))
            .cloned()
            .collect();

        // Largest first, ties broken by id so selection is deterministic
        outputs.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.id.cmp(&b.id)));
        outputs
    }

    pub fn balance(&self, key: &PublicKey) -> Result<u64> {
        self.entries
            .values()
            .filter(|output| output.is_owned_by(key))
            .try_fold(0u64, |acc, output| acc.checked_add(output.amount))
            .ok_or(LedgerError::AmountOverflow)
    }

    /// Pick outputs owned by `key` until their total reaches `amount`.
    /// Returns the accumulated total, which may fall short of `amount`.
    pub fn find_spendable_outputs(&self, key: &PublicKey, amount: u64) -> Result<(u64, Vec<TxOutput>)> {
        let mut accumulated = 0u64;
        let mut selected = Vec::new();

        for output in self.outputs_for(key) {
            if accumulated >= amount && !selected.is_empty() {
                break;
            }
            accumulated = accumulated.checked_add(output.amount)
                .ok_or(LedgerError::AmountOverflow)?;
            selected.push(output);
        }

        Ok((accumulated, selected))
    }

    pub fn total_value(&self) -> Result<u64> {
        self.entries
            .values()
            .try_fold(0u64, |acc, output| acc.checked_add(output.amount))
            .ok_or(LedgerError::AmountOverflow)
    }
}
