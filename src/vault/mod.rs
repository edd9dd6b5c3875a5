//! Threshold-custody core
//!
//! A fixed pool of members jointly controls funds held by a shared vault.
//! The administrator proposes transfers and manages membership; members
//! confirm proposals; a transfer executes once `ceil(2n/3)` distinct
//! members have confirmed it.
//!
//! # Example
//!
//! ```ignore
//! use quorum_vault::vault::{AssetId, Vault};
//!
//! let mut vault = Vault::new(members, admin, sweep_target)?;
//!
//! // Administrator proposes, members confirm.
//! let tx_id = vault.propose(&admin, recipient, 100, AssetId::Native)?;
//! vault.confirm(&member_a, tx_id, &mut assets, &mut bank)?;
//! vault.confirm(&member_b, tx_id, &mut assets, &mut bank)?;
//!
//! // With a 3-member pool (quorum 2) the transfer has now executed.
//! assert!(vault.transaction(tx_id)?.executed);
//! ```

pub mod event;
pub mod ledger;
pub mod registry;
pub mod transaction;
pub mod vault;

pub use event::{EventRecord, VaultEvent};
pub use ledger::TransactionLedger;
pub use registry::{Address, MembershipRegistry, VaultError, MIN_MEMBERS};
pub use transaction::{AssetId, VaultTransaction};
pub use vault::Vault;
