//! Membership registry
//!
//! Owns the member set, the administrator identity, and the derived quorum
//! threshold. The threshold is recomputed on every membership change so that
//! quorum is always a function of current membership.

use crate::asset::host::NativeSendError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// An authenticated identity. The empty string is the null identity and is
/// rejected wherever an identity is supplied.
pub type Address = String;

/// Errors for vault governance and transaction operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("caller lacks the required role")]
    Unauthorized,
    #[error("not a member: {0}")]
    NotAMember(Address),
    #[error("no transaction at index {0}")]
    InvalidIndex(usize),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("member {member} already confirmed transaction {tx_id}")]
    AlreadyConfirmed { member: Address, tx_id: usize },
    #[error("transaction {0} already executed")]
    AlreadyExecuted(usize),
    #[error("cannot remove the last member")]
    LastMemberGuard,
    #[error("removal would leave quorum of {required} above member count {remaining}")]
    QuorumViolation { required: usize, remaining: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error(transparent)]
    NativeSend(#[from] NativeSendError),
}

/// Minimum member count accepted at construction
pub const MIN_MEMBERS: usize = 3;

/// Quorum formula: ceil(2n/3) confirmations out of n members.
fn quorum_for(member_count: usize) -> usize {
    (2 * member_count).div_ceil(3)
}

/// Registry of authorized members and the privileged administrator.
///
/// Member order is unspecified and not stable across removals; removal
/// swaps the target with the last slot and shrinks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MembershipRegistry {
    /// Members in slot order
    members: Vec<Address>,
    /// Member -> slot index, for O(1) lookup and O(1) removal
    index: HashMap<Address, usize>,
    /// The single identity allowed to propose and manage membership
    administrator: Address,
    /// Confirmations required for execution, recomputed on every change
    threshold: usize,
}

impl MembershipRegistry {
    /// Create a registry from the initial member set.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if fewer than 3 members are supplied,
    /// any identity is null or duplicated, or the administrator is null.
    pub fn new(members: Vec<Address>, administrator: Address) -> Result<Self, VaultError> {
        if members.len() < MIN_MEMBERS {
            return Err(VaultError::InvalidConfiguration(format!(
                "need at least {} members, got {}",
                MIN_MEMBERS,
                members.len()
            )));
        }

        if administrator.is_empty() {
            return Err(VaultError::InvalidConfiguration(
                "administrator identity is null".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(members.len());
        for (slot, member) in members.iter().enumerate() {
            if member.is_empty() {
                return Err(VaultError::InvalidConfiguration(
                    "member identity is null".to_string(),
                ));
            }
            if index.insert(member.clone(), slot).is_some() {
                return Err(VaultError::InvalidConfiguration(format!(
                    "duplicate member: {}",
                    member
                )));
            }
        }

        let threshold = quorum_for(members.len());
        log::info!(
            "membership registry created: {} members, quorum {}",
            members.len(),
            threshold
        );

        Ok(Self {
            members,
            index,
            administrator,
            threshold,
        })
    }

    /// Check whether an identity is a current member.
    pub fn is_member(&self, identity: &str) -> bool {
        self.index.contains_key(identity)
    }

    /// Check whether an identity is the administrator.
    pub fn is_administrator(&self, identity: &str) -> bool {
        self.administrator == identity
    }

    /// The administrator identity.
    pub fn administrator(&self) -> &str {
        &self.administrator
    }

    /// Current quorum threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Current member count.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Current members. Order is unspecified and changes across removals.
    pub fn members(&self) -> &[Address] {
        &self.members
    }

    /// Add a batch of new members. All-or-nothing: the whole batch is
    /// validated before anything is appended.
    ///
    /// # Errors
    /// `Unauthorized` unless `caller` is the administrator; `InvalidInput`
    /// if the batch is empty, contains a null identity, an existing member,
    /// or an internal duplicate.
    pub fn add_members(&mut self, caller: &str, new_members: &[Address]) -> Result<(), VaultError> {
        if !self.is_administrator(caller) {
            return Err(VaultError::Unauthorized);
        }

        if new_members.is_empty() {
            return Err(VaultError::InvalidInput("empty member batch".to_string()));
        }

        for (i, member) in new_members.iter().enumerate() {
            if member.is_empty() {
                return Err(VaultError::InvalidInput(
                    "member identity is null".to_string(),
                ));
            }
            if self.is_member(member) {
                return Err(VaultError::InvalidInput(format!(
                    "already a member: {}",
                    member
                )));
            }
            if new_members[..i].contains(member) {
                return Err(VaultError::InvalidInput(format!(
                    "duplicate in batch: {}",
                    member
                )));
            }
        }

        for member in new_members {
            self.index.insert(member.clone(), self.members.len());
            self.members.push(member.clone());
        }
        self.threshold = quorum_for(self.members.len());

        log::info!(
            "added {} members, count now {}, quorum {}",
            new_members.len(),
            self.members.len(),
            self.threshold
        );

        Ok(())
    }

    /// Remove a member.
    ///
    /// The guard compares the *current* threshold against the post-removal
    /// count, so a removal can never strand outstanding proposals below an
    /// unreachable quorum. The threshold is recomputed afterwards.
    ///
    /// # Errors
    /// `Unauthorized` unless `caller` is the administrator; `NotAMember` if
    /// absent; `LastMemberGuard` if the set would become empty;
    /// `QuorumViolation` if the current threshold would exceed the
    /// remaining member count.
    pub fn remove_member(&mut self, caller: &str, member: &str) -> Result<(), VaultError> {
        if !self.is_administrator(caller) {
            return Err(VaultError::Unauthorized);
        }

        let slot = *self
            .index
            .get(member)
            .ok_or_else(|| VaultError::NotAMember(member.to_string()))?;

        let remaining = self.members.len() - 1;
        if remaining == 0 {
            return Err(VaultError::LastMemberGuard);
        }
        if self.threshold > remaining {
            return Err(VaultError::QuorumViolation {
                required: self.threshold,
                remaining,
            });
        }

        // Swap with the last slot and shrink; fix up the moved entry.
        self.members.swap_remove(slot);
        self.index.remove(member);
        if let Some(moved) = self.members.get(slot) {
            self.index.insert(moved.clone(), slot);
        }
        self.threshold = quorum_for(self.members.len());

        log::info!(
            "removed member {}, count now {}, quorum {}",
            member,
            self.members.len(),
            self.threshold
        );

        Ok(())
    }
}
