//! Capability traits the vault consumes from its execution environment
//!
//! The vault never touches balances directly. Token movements go through an
//! [`AssetLedger`] and native-currency movements through a [`NativeCurrency`],
//! both invoked with the vault as the implicit sender.

use thiserror::Error;

/// Error returned when the host environment rejects a native-currency send.
///
/// A failed send aborts the enclosing vault operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("native send of {amount} to {to} failed: {reason}")]
pub struct NativeSendError {
    /// Intended recipient
    pub to: String,
    /// Amount that could not be delivered
    pub amount: u128,
    /// Host-provided reason
    pub reason: String,
}

impl NativeSendError {
    /// Create a new send error
    pub fn new(to: impl Into<String>, amount: u128, reason: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount,
            reason: reason.into(),
        }
    }
}

/// External fungible-asset ledger, scoped to the vault's own account.
///
/// One implementation serves every asset identifier; the vault is always the
/// sender of a `transfer` and the account queried by `balance_of`.
pub trait AssetLedger {
    /// Move `amount` of `asset` from the vault's holdings to `to`.
    ///
    /// Returns the ledger's own success flag. The vault does not interpret
    /// a `false` as an abort; see the execution policy on `Vault::confirm`.
    fn transfer(&mut self, asset: &str, to: &str, amount: u128) -> bool;

    /// The vault's current holdings of `asset`.
    fn balance_of(&self, asset: &str) -> u128;
}

/// Native-currency send capability of the execution environment.
pub trait NativeCurrency {
    /// Send `amount` of native currency from the vault to `to`.
    ///
    /// Unlike [`AssetLedger::transfer`], a failure here is an error that
    /// aborts the enclosing operation.
    fn send(&mut self, to: &str, amount: u128) -> Result<(), NativeSendError>;
}
