//! Observable notifications
//!
//! Every externally visible occurrence appends one entry to the vault's
//! event log. The log is append-only and ordered by occurrence.

use crate::vault::registry::Address;
use crate::vault::transaction::AssetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification emitted by a vault operation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VaultEvent {
    /// Native currency received by the vault outside the proposal workflow
    Deposit { sender: Address, amount: u128 },
    /// A transaction was proposed
    Submit { tx_id: usize, asset: AssetId },
    /// A member confirmed a transaction
    Confirm { member: Address, tx_id: usize },
    /// A transaction reached quorum and executed
    Execute { tx_id: usize },
    /// Members were added to the registry
    MembersAdded { members: Vec<Address> },
    /// A member was removed from the registry
    MemberRemoved { member: Address },
}

/// A log entry: the event plus when it was recorded
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRecord {
    /// What happened
    pub event: VaultEvent,
    /// When it was recorded
    pub at: DateTime<Utc>,
}

impl EventRecord {
    /// Stamp an event with the current time.
    pub fn now(event: VaultEvent) -> Self {
        Self {
            event,
            at: Utc::now(),
        }
    }
}
