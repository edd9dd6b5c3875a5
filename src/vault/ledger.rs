//! Transaction ledger
//!
//! Append-only sequence of proposed transfers. Indices are stable for the
//! life of the vault: records are never removed and never reordered. Also
//! holds the designated sweep address fixed at construction.

use crate::vault::registry::{Address, VaultError};
use crate::vault::transaction::{AssetId, VaultTransaction};
use serde::{Deserialize, Serialize};

/// Ordered store of proposed transactions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionLedger {
    /// All records ever proposed, in proposal order
    transactions: Vec<VaultTransaction>,
    /// Recipient of administrator sweeps, fixed at construction
    sweep_address: Address,
}

impl TransactionLedger {
    /// Create an empty ledger with the given sweep recipient.
    pub fn new(sweep_address: Address) -> Self {
        Self {
            transactions: Vec::new(),
            sweep_address,
        }
    }

    /// The designated sweep recipient.
    pub fn sweep_address(&self) -> &str {
        &self.sweep_address
    }

    /// Number of transactions ever proposed.
    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    /// Append a new pending record and return its stable index.
    ///
    /// # Errors
    /// `InvalidInput` for the present-but-null asset identifier.
    pub fn propose(
        &mut self,
        to: Address,
        amount: u128,
        asset: AssetId,
    ) -> Result<usize, VaultError> {
        if let AssetId::Token(id) = &asset {
            if id.is_empty() {
                return Err(VaultError::InvalidInput(
                    "null asset identifier".to_string(),
                ));
            }
        }

        let tx_id = self.transactions.len();
        self.transactions.push(VaultTransaction::new(to, amount, asset));
        Ok(tx_id)
    }

    /// Borrow a record.
    ///
    /// # Errors
    /// `InvalidIndex` if `tx_id` is out of range.
    pub fn get(&self, tx_id: usize) -> Result<&VaultTransaction, VaultError> {
        self.transactions
            .get(tx_id)
            .ok_or(VaultError::InvalidIndex(tx_id))
    }

    /// Read-only copy of all of a record's fields.
    pub fn snapshot(&self, tx_id: usize) -> Result<VaultTransaction, VaultError> {
        self.get(tx_id).cloned()
    }

    /// Record a member's confirmation on a transaction; returns the new
    /// confirmation count.
    pub fn record_confirmation(&mut self, member: &str, tx_id: usize) -> Result<usize, VaultError> {
        self.transactions
            .get_mut(tx_id)
            .ok_or(VaultError::InvalidIndex(tx_id))?
            .record_confirmation(member, tx_id)
    }

    /// Flip a record to Executed.
    pub fn mark_executed(&mut self, tx_id: usize) -> Result<(), VaultError> {
        self.transactions
            .get_mut(tx_id)
            .ok_or(VaultError::InvalidIndex(tx_id))?
            .mark_executed(tx_id)
    }

    /// All records in proposal order.
    pub fn transactions(&self) -> &[VaultTransaction] {
        &self.transactions
    }
}
