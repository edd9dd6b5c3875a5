//! Persistence for the CLI's vault state

pub mod persistence;

pub use persistence::{StorageConfig, StorageError, VaultState, VaultStore};
