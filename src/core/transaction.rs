use crate::crypto::hash::{Hash256, Hashable};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::crypto::signatures::Signature;
use crate::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// A transfer of `amount` from `sender` to `recipient`, funded by `inputs`.
///
/// `id`, `sequence` and `outputs` are filled in when the transaction is applied
/// to a ledger; until then `id` is `None` and `outputs` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<Hash256>,
    pub sender: PublicKey,
    pub recipient: PublicKey,
    pub amount: u64,
    pub sequence: u64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub signature: Option<Signature>,
}

/// Reference to an unspent output. `resolved` is a copy of the referenced
/// output taken from the ledger at application time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub output_id: Hash256,
    pub resolved: Option<TxOutput>,
}

/// An unspent output. Immutable once created; `id` commits to every other field.
///
/// `index` is the output's position in its transaction, so two outputs of one
/// transaction never share an id even with equal recipient and amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub id: Hash256,
    pub recipient: PublicKey,
    pub amount: u64,
    pub origin_tx: Hash256,
    pub index: u32,
}

impl Transaction {
    pub fn new(sender: PublicKey, recipient: PublicKey, amount: u64, inputs: Vec<TxInput>) -> Self {
        Self {
            id: None,
            sender,
            recipient,
            amount,
            sequence: 0,
            inputs,
            outputs: Vec::new(),
            signature: None,
        }
    }

    /// Bytes covered by the sender's signature: sender, recipient and amount.
    /// Inputs and outputs are deliberately not part of it.
    pub fn signing_message(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(self.sender.to_hex().as_bytes());
        data.extend_from_slice(self.recipient.to_hex().as_bytes());
        data.extend_from_slice(self.amount.to_string().as_bytes());
        data
    }

    pub fn sign(&mut self, private_key: &PrivateKey) -> Result<()> {
        if private_key.public_key() != self.sender {
            return Err(LedgerError::Crypto("Signing key does not belong to the sender".to_string()));
        }

        self.signature = Some(private_key.sign(&self.signing_message())?);
        Ok(())
    }

    pub fn verify_signature(&self) -> Result<bool> {
        match &self.signature {
            Some(signature) => self.sender.verify(&self.signing_message(), signature),
            None => Ok(false),
        }
    }

    /// Transaction id for a given sequence number.
    pub fn compute_id(&self, sequence: u64) -> Hash256 {
        Hash256::hash_parts(&[
            self.sender.to_hex().as_bytes(),
            self.recipient.to_hex().as_bytes(),
            self.amount.to_string().as_bytes(),
            sequence.to_string().as_bytes(),
        ])
    }

    /// Sum of the resolved input amounts. Unresolved inputs contribute nothing.
    pub fn total_input_value(&self) -> Result<u64> {
        self.inputs
            .iter()
            .filter_map(|input| input.resolved.as_ref())
            .try_fold(0u64, |acc, output| acc.checked_add(output.amount))
            .ok_or(LedgerError::AmountOverflow)
    }

    pub fn total_output_value(&self) -> Result<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, output| acc.checked_add(output.amount))
            .ok_or(LedgerError::AmountOverflow)
    }

    pub fn is_applied(&self) -> bool {
        self.id.is_some()
    }
}

impl Hashable for Transaction {
    /// The assigned id, or the zero hash for a transaction not yet applied.
    fn hash(&self) -> Hash256 {
        self.id.unwrap_or_else(Hash256::zero)
    }
}

impl TxInput {
    pub fn new(output_id: Hash256) -> Self {
        Self {
            output_id,
            resolved: None,
        }
    }
}

impl TxOutput {
    pub fn new(recipient: PublicKey, amount: u64, origin_tx: Hash256, index: u32) -> Self {
        let id = Self::compute_id(&recipient, amount, &origin_tx, index);

        Self {
            id,
            recipient,
            amount,
            origin_tx,
            index,
        }
    }

    pub fn compute_id(recipient: &PublicKey, amount: u64, origin_tx: &Hash256, index: u32) -> Hash256 {
        Hash256::hash_parts(&[
            recipient.to_hex().as_bytes(),
            amount.to_string().as_bytes(),
            origin_tx.to_hex().as_bytes(),
            index.to_string().as_bytes(),
        ])
    }

    pub fn is_owned_by(&self, key: &PublicKey) -> bool {
        &self.recipient == key
    }

    /// True when `id` still commits to the recipient, amount, origin and index.
    pub fn id_is_consistent(&self) -> bool {
        self.id == Self::compute_id(&self.recipient, self.amount, &self.origin_tx, self.index)
    }
}
