//! Quorum-Vault: threshold-signature custody in Rust
//!
//! A fixed pool of members jointly controls funds (native currency and
//! fungible tokens) held by a shared vault. No single member can move funds
//! alone: each proposed transfer needs confirmations from `ceil(2n/3)` of
//! the current members before it executes. The crate provides:
//! - Membership registry with a live-recomputed quorum threshold
//! - Append-only transaction ledger with per-member confirmation tracking
//! - Exactly-once execution, committed before any external transfer call
//! - Administrator sweeps to a fixed designated address
//! - Capability traits for the external asset ledger and native currency
//! - JSON persistence for the CLI's working state
//!
//! # Example
//!
//! ```rust
//! use quorum_vault::asset::{InMemoryAssets, InMemoryBank};
//! use quorum_vault::vault::{AssetId, Vault};
//!
//! let members = vec!["alice".into(), "bob".into(), "carol".into()];
//! let mut vault = Vault::new(members, "admin".into(), "treasury".into()).unwrap();
//!
//! let mut assets = InMemoryAssets::new("vault");
//! let mut bank = InMemoryBank::new("vault");
//! bank.credit("vault", 1_000);
//!
//! // 2-of-3: the second confirmation triggers the transfer.
//! let tx_id = vault.propose("admin", "dora".into(), 100, AssetId::Native).unwrap();
//! vault.confirm("alice", tx_id, &mut assets, &mut bank).unwrap();
//! vault.confirm("bob", tx_id, &mut assets, &mut bank).unwrap();
//!
//! assert!(vault.transaction(tx_id).unwrap().executed);
//! assert_eq!(bank.balance_of("dora"), 100);
//! ```

pub mod asset;
pub mod storage;
pub mod vault;

// Re-export commonly used types
pub use asset::{AssetLedger, InMemoryAssets, InMemoryBank, NativeCurrency, NativeSendError};
pub use storage::{StorageConfig, StorageError, VaultState, VaultStore};
pub use vault::{
    Address, AssetId, EventRecord, MembershipRegistry, TransactionLedger, Vault, VaultError,
    VaultEvent, VaultTransaction,
};
