//! Vault transaction records
//!
//! A record's identity fields are fixed at proposal time; only its
//! confirmation state and executed flag ever change. Records live in an
//! append-only sequence and are addressed by index.

use crate::vault::registry::{Address, VaultError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifies what a transfer moves: the native currency or a fungible
/// asset on the external ledger.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetId {
    /// The execution environment's native currency
    Native,
    /// A fungible asset, addressed by its ledger identifier
    Token(String),
}

impl AssetId {
    /// Whether this is the native-currency sentinel.
    pub fn is_native(&self) -> bool {
        matches!(self, AssetId::Native)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Native => write!(f, "native"),
            AssetId::Token(id) => write!(f, "token:{}", id),
        }
    }
}

/// A proposed transfer awaiting member confirmations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultTransaction {
    /// Recipient of the transfer
    pub to: Address,
    /// Amount to move
    pub amount: u128,
    /// What is being moved
    pub asset: AssetId,
    /// Number of distinct member confirmations recorded
    pub confirmations: usize,
    /// Members who have confirmed
    confirmed_by: HashSet<Address>,
    /// Set once, when the confirmation count first reaches quorum
    pub executed: bool,
    /// Proposal timestamp
    pub created_at: DateTime<Utc>,
}

impl VaultTransaction {
    /// Create a new pending record with zero confirmations.
    pub fn new(to: Address, amount: u128, asset: AssetId) -> Self {
        Self {
            to,
            amount,
            asset,
            confirmations: 0,
            confirmed_by: HashSet::new(),
            executed: false,
            created_at: Utc::now(),
        }
    }

    /// Whether `member` has already confirmed this record.
    pub fn has_confirmed(&self, member: &str) -> bool {
        self.confirmed_by.contains(member)
    }

    /// Record a confirmation and return the new count.
    ///
    /// `tx_id` is only used to report errors; the record does not know its
    /// own index.
    ///
    /// # Errors
    /// `AlreadyConfirmed` if this member confirmed before (checked first),
    /// `AlreadyExecuted` if the record is terminal.
    pub fn record_confirmation(
        &mut self,
        member: &str,
        tx_id: usize,
    ) -> Result<usize, VaultError> {
        if self.has_confirmed(member) {
            return Err(VaultError::AlreadyConfirmed {
                member: member.to_string(),
                tx_id,
            });
        }
        if self.executed {
            return Err(VaultError::AlreadyExecuted(tx_id));
        }

        self.confirmed_by.insert(member.to_string());
        self.confirmations += 1;
        Ok(self.confirmations)
    }

    /// Flip the record to its terminal state.
    ///
    /// # Errors
    /// `AlreadyExecuted` if it was already flipped.
    pub fn mark_executed(&mut self, tx_id: usize) -> Result<(), VaultError> {
        if self.executed {
            return Err(VaultError::AlreadyExecuted(tx_id));
        }
        self.executed = true;
        Ok(())
    }
}
