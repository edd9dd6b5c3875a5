//! Vault persistence layer
//!
//! Saves and loads the CLI's working state (the vault plus its in-memory
//! hosts) as pretty-printed JSON with a single backup copy.

use crate::asset::memory::{InMemoryAssets, InMemoryBank};
use crate::vault::Vault;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Everything the CLI persists between invocations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultState {
    /// The custody core
    pub vault: Vault,
    /// Fungible-asset host backing the vault's token holdings
    pub assets: InMemoryAssets,
    /// Native-currency host backing the vault's native balance
    pub bank: InMemoryBank,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: std::path::PathBuf,
    pub state_file: String,
    pub backup_enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: std::path::PathBuf::from(".vault_data"),
            state_file: "vault.json".to_string(),
            backup_enabled: true,
        }
    }
}

/// Vault state storage manager
pub struct VaultStore {
    config: StorageConfig,
}

impl VaultStore {
    /// Create a new storage manager, creating the data directory if needed.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    /// Get the state file path
    fn state_path(&self) -> std::path::PathBuf {
        self.config.data_dir.join(&self.config.state_file)
    }

    /// Get the backup file path
    fn backup_path(&self) -> std::path::PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup", self.config.state_file))
    }

    /// Save the state to disk.
    ///
    /// Writes through a temporary file and renames, keeping the previous
    /// state as a backup when one exists.
    pub fn save(&self, state: &VaultState) -> Result<(), StorageError> {
        let path = self.state_path();

        if self.config.backup_enabled && path.exists() {
            fs::copy(&path, self.backup_path())?;
        }

        let temp_path = self.config.data_dir.join("vault.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, state)?;

        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    /// Load the state from disk.
    pub fn load(&self) -> Result<VaultState, StorageError> {
        let path = self.state_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Vault state file not found".to_string(),
            ));
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Check if a saved state exists
    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    /// Delete the saved state
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.state_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
