//! In-memory host implementations
//!
//! Back the capability traits with plain balance maps for the CLI and tests.
//! A real deployment would implement the traits against its own ledger.

use crate::asset::host::{AssetLedger, NativeCurrency, NativeSendError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// In-memory fungible-asset ledger holding balances for any number of assets.
///
/// The vault's account name is fixed at construction; `transfer` debits it
/// and `balance_of` reads it, matching the implicit-sender contract.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InMemoryAssets {
    /// Account the vault's holdings live under
    vault: String,
    /// Balances: asset id -> (account -> amount)
    balances: HashMap<String, HashMap<String, u128>>,
}

impl InMemoryAssets {
    /// Create an empty ledger with the given vault account.
    pub fn new(vault: impl Into<String>) -> Self {
        Self {
            vault: vault.into(),
            balances: HashMap::new(),
        }
    }

    /// Credit `amount` of `asset` to an arbitrary account.
    pub fn mint(&mut self, asset: &str, account: &str, amount: u128) {
        *self
            .balances
            .entry(asset.to_string())
            .or_default()
            .entry(account.to_string())
            .or_insert(0) += amount;
    }

    /// Balance of any account, not just the vault's.
    pub fn account_balance(&self, asset: &str, account: &str) -> u128 {
        self.balances
            .get(asset)
            .and_then(|accounts| accounts.get(account))
            .copied()
            .unwrap_or(0)
    }
}

impl AssetLedger for InMemoryAssets {
    fn transfer(&mut self, asset: &str, to: &str, amount: u128) -> bool {
        let vault = self.vault.clone();
        let accounts = self.balances.entry(asset.to_string()).or_default();
        let held = accounts.get(&vault).copied().unwrap_or(0);
        if held < amount {
            return false;
        }

        *accounts.entry(vault).or_insert(0) -= amount;
        *accounts.entry(to.to_string()).or_insert(0) += amount;
        true
    }

    fn balance_of(&self, asset: &str) -> u128 {
        self.account_balance(asset, &self.vault)
    }
}

/// In-memory native-currency bank.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InMemoryBank {
    /// Account the vault's native funds live under
    vault: String,
    /// Balances: account -> amount
    balances: HashMap<String, u128>,
}

impl InMemoryBank {
    /// Create an empty bank with the given vault account.
    pub fn new(vault: impl Into<String>) -> Self {
        Self {
            vault: vault.into(),
            balances: HashMap::new(),
        }
    }

    /// Credit native currency to an account.
    pub fn credit(&mut self, account: &str, amount: u128) {
        *self.balances.entry(account.to_string()).or_insert(0) += amount;
    }

    /// Native balance of an account.
    pub fn balance_of(&self, account: &str) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Native balance of the vault itself.
    pub fn vault_balance(&self) -> u128 {
        self.balances.get(&self.vault).copied().unwrap_or(0)
    }
}

impl NativeCurrency for InMemoryBank {
    fn send(&mut self, to: &str, amount: u128) -> Result<(), NativeSendError> {
        let vault = self.vault.clone();
        let held = self.balances.get(&vault).copied().unwrap_or(0);
        if held < amount {
            return Err(NativeSendError::new(to, amount, "insufficient vault funds"));
        }

        *self.balances.entry(vault).or_insert(0) -= amount;
        *self.balances.entry(to.to_string()).or_insert(0) += amount;
        Ok(())
    }
}
