use crate::core::{LedgerContext, Transaction, TxInput};
use crate::crypto::keys::{KeyPair, PrivateKey, PublicKey};
use crate::{LedgerError, Result};

/// A single key pair and the operations needed to spend from it.
///
/// The wallet only reads the ledger; funds move when the transaction it builds
/// is applied by a [`LedgerContext`].
#[derive(Debug, Clone)]
pub struct Wallet {
    keypair: KeyPair,
}

impl Wallet {
    pub fn new() -> Result<Self> {
        Ok(Self {
            keypair: KeyPair::generate()?,
        })
    }

    pub fn from_private_key(private_key: PrivateKey) -> Self {
        Self {
            keypair: KeyPair::from_private_key(private_key),
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.keypair.private_key
    }

    pub fn balance(&self, ledger: &LedgerContext) -> Result<u64> {
        ledger.balance_of(self.public_key())
    }

    /// Build and sign a transfer of `amount` to `recipient`.
    ///
    /// Owned outputs are taken largest first until they cover `amount`.
    pub fn send_funds(&self, ledger: &LedgerContext, recipient: &PublicKey, amount: u64) -> Result<Transaction> {
        let (available, outputs) = ledger.find_spendable_outputs(self.public_key(), amount)?;

        if available < amount {
            log::warn!("Not enough funds: {} requested, {} available", amount, available);
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available,
            });
        }

        let inputs = outputs.iter().map(|output| TxInput::new(output.id)).collect();
        let mut transaction = Transaction::new(self.public_key().clone(), recipient.clone(), amount, inputs);
        transaction.sign(self.private_key())?;

        log::debug!("Built transaction of {} spending {} output(s)", amount, outputs.len());
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsensusConfig;

    fn funded_ledger(wallet: &Wallet, amount: u64) -> Result<LedgerContext> {
        let ledger = LedgerContext::new(ConsensusConfig { difficulty: 1, minimum_transaction_amount: 1 })?;
        let coinbase = Wallet::new()?;

        let mut genesis = Transaction::new(coinbase.public_key().clone(), wallet.public_key().clone(), amount, vec![]);
        genesis.sign(coinbase.private_key())?;
        ledger.apply_genesis(&mut genesis)?;

        Ok(ledger)
    }

    #[test]
    fn test_wallet_creation() -> Result<()> {
        let wallet = Wallet::new()?;
        let restored = Wallet::from_private_key(PrivateKey::from_bytes(&wallet.private_key().to_bytes())?);

        assert_eq!(wallet.public_key(), restored.public_key());
        assert_ne!(wallet.public_key(), Wallet::new()?.public_key());

        Ok(())
    }

    #[test]
    fn test_send_funds_with_change() -> Result<()> {
        let alice = Wallet::new()?;
        let bob = Wallet::new()?;
        let ledger = funded_ledger(&alice, 100)?;

        let mut tx = alice.send_funds(&ledger, bob.public_key(), 20)?;
        assert!(tx.verify_signature()?);
        assert_eq!(tx.inputs.len(), 1);

        // Building does not touch the ledger
        assert_eq!(alice.balance(&ledger)?, 100);

        ledger.apply_transaction(&mut tx)?;
        assert_eq!(alice.balance(&ledger)?, 80);
        assert_eq!(bob.balance(&ledger)?, 20);

        let mut back = bob.send_funds(&ledger, alice.public_key(), 20)?;
        ledger.apply_transaction(&mut back)?;
        assert_eq!(alice.balance(&ledger)?, 100);
        assert_eq!(bob.balance(&ledger)?, 0);

        Ok(())
    }

    #[test]
    fn test_send_funds_insufficient() -> Result<()> {
        let alice = Wallet::new()?;
        let bob = Wallet::new()?;
        let ledger = funded_ledger(&alice, 10)?;

        assert!(matches!(
            alice.send_funds(&ledger, bob.public_key(), 11),
            Err(LedgerError::InsufficientFunds { required: 11, available: 10 })
        ));
        assert!(matches!(
            bob.send_funds(&ledger, alice.public_key(), 1),
            Err(LedgerError::InsufficientFunds { available: 0, .. })
        ));

        Ok(())
    }

    #[test]
    fn test_send_funds_combines_outputs() -> Result<()> {
        let alice = Wallet::new()?;
        let bob = Wallet::new()?;
        let ledger = funded_ledger(&alice, 100)?;

        // Split Alice's funds into 60 (to Bob) and 40 (change), then have Bob
        // return 30 so Alice holds 40 + 30
        let mut split = alice.send_funds(&ledger, bob.public_key(), 60)?;
        ledger.apply_transaction(&mut split)?;
        let mut refund = bob.send_funds(&ledger, alice.public_key(), 30)?;
        ledger.apply_transaction(&mut refund)?;

        let mut tx = alice.send_funds(&ledger, bob.public_key(), 65)?;
        assert_eq!(tx.inputs.len(), 2);
        ledger.apply_transaction(&mut tx)?;

        assert_eq!(alice.balance(&ledger)?, 5);
        assert_eq!(bob.balance(&ledger)?, 95);

        Ok(())
    }
}
