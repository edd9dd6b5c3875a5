//! The vault facade
//!
//! Ties the membership registry and the transaction ledger together behind a
//! single mutation domain and owns the append-only event log. Every mutating
//! operation takes `&mut self`; a concurrent host wraps the whole vault in
//! one lock or hands it to a single-threaded actor. Splitting the two
//! components across separate synchronization domains would let a
//! confirmation race a removal and break the quorum invariant.

use crate::asset::host::{AssetLedger, NativeCurrency};
use crate::vault::event::{EventRecord, VaultEvent};
use crate::vault::ledger::TransactionLedger;
use crate::vault::registry::{Address, MembershipRegistry, VaultError};
use crate::vault::transaction::{AssetId, VaultTransaction};
use serde::{Deserialize, Serialize};

/// A jointly governed custody vault.
///
/// Funds logically belong to the member consensus, never to any individual
/// member or to the administrator. The administrator proposes transfers and
/// manages membership; members confirm; `ceil(2n/3)` confirmations execute.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vault {
    registry: MembershipRegistry,
    ledger: TransactionLedger,
    events: Vec<EventRecord>,
}

impl Vault {
    /// Create a vault from the initial member set, the administrator, and
    /// the designated sweep recipient.
    ///
    /// # Errors
    /// `InvalidConfiguration` for fewer than 3 members, null or duplicate
    /// identities, or a null sweep address.
    pub fn new(
        members: Vec<Address>,
        administrator: Address,
        sweep_address: Address,
    ) -> Result<Self, VaultError> {
        if sweep_address.is_empty() {
            return Err(VaultError::InvalidConfiguration(
                "sweep address is null".to_string(),
            ));
        }

        Ok(Self {
            registry: MembershipRegistry::new(members, administrator)?,
            ledger: TransactionLedger::new(sweep_address),
            events: Vec::new(),
        })
    }

    fn emit(&mut self, event: VaultEvent) {
        self.events.push(EventRecord::now(event));
    }

    // =========================================================================
    // Proposal and confirmation
    // =========================================================================

    /// Propose a transfer out of the vault. Administrator only.
    ///
    /// Returns the stable index identifying the transaction from here on.
    pub fn propose(
        &mut self,
        caller: &str,
        to: Address,
        amount: u128,
        asset: AssetId,
    ) -> Result<usize, VaultError> {
        if !self.registry.is_administrator(caller) {
            return Err(VaultError::Unauthorized);
        }

        let tx_id = self.ledger.propose(to, amount, asset.clone())?;
        log::info!("transaction {} proposed ({}, amount {})", tx_id, asset, amount);
        self.emit(VaultEvent::Submit { tx_id, asset });
        Ok(tx_id)
    }

    /// Confirm a pending transaction as a member; executes it once the
    /// confirmation count reaches the live quorum threshold.
    ///
    /// The threshold is read from the registry at confirmation time, never
    /// from a proposal-time snapshot: membership changes between proposal
    /// and confirmation change how many confirmations are still required.
    /// The record flips to Executed *before* the external transfer runs, so
    /// a reentrant confirmation during the transfer observes the terminal
    /// state and is rejected.
    ///
    /// A token ledger reporting `false` does not undo execution; the record
    /// stays Executed and the failure is logged. A native-send error is
    /// surfaced after the state flip, the one place a failure does not leave
    /// state untouched.
    pub fn confirm(
        &mut self,
        caller: &str,
        tx_id: usize,
        assets: &mut dyn AssetLedger,
        bank: &mut dyn NativeCurrency,
    ) -> Result<(), VaultError> {
        if !self.registry.is_member(caller) {
            return Err(VaultError::NotAMember(caller.to_string()));
        }

        let count = self.ledger.record_confirmation(caller, tx_id)?;
        self.emit(VaultEvent::Confirm {
            member: caller.to_string(),
            tx_id,
        });

        if count < self.registry.threshold() {
            return Ok(());
        }

        // Quorum reached: commit the terminal state, then move the funds.
        self.ledger.mark_executed(tx_id)?;
        let tx = self.ledger.snapshot(tx_id)?;
        match &tx.asset {
            AssetId::Native => bank.send(&tx.to, tx.amount)?,
            AssetId::Token(id) => {
                if !assets.transfer(id, &tx.to, tx.amount) {
                    log::warn!(
                        "asset ledger reported failure transferring {} of {} to {} for transaction {}",
                        tx.amount,
                        id,
                        tx.to,
                        tx_id
                    );
                }
            }
        }

        log::info!("transaction {} executed with {} confirmations", tx_id, count);
        self.emit(VaultEvent::Execute { tx_id });
        Ok(())
    }

    // =========================================================================
    // Administrator sweeps (bypass quorum)
    // =========================================================================

    /// Move native currency straight to the designated sweep address.
    /// Administrator only; no confirmation workflow, no notification.
    pub fn sweep_native(
        &mut self,
        caller: &str,
        amount: u128,
        bank: &mut dyn NativeCurrency,
    ) -> Result<(), VaultError> {
        if !self.registry.is_administrator(caller) {
            return Err(VaultError::Unauthorized);
        }

        let to = self.ledger.sweep_address().to_string();
        bank.send(&to, amount)?;
        log::info!("swept {} native to {}", amount, to);
        Ok(())
    }

    /// Move a fungible asset straight to the designated sweep address.
    /// Administrator only.
    ///
    /// # Errors
    /// `InvalidInput` if given the native sentinel; use [`Vault::sweep_native`].
    pub fn sweep_asset(
        &mut self,
        caller: &str,
        amount: u128,
        asset: &AssetId,
        assets: &mut dyn AssetLedger,
    ) -> Result<(), VaultError> {
        if !self.registry.is_administrator(caller) {
            return Err(VaultError::Unauthorized);
        }

        let id = match asset {
            AssetId::Native => {
                return Err(VaultError::InvalidInput(
                    "native sentinel on asset sweep".to_string(),
                ))
            }
            AssetId::Token(id) if id.is_empty() => {
                return Err(VaultError::InvalidInput(
                    "null asset identifier".to_string(),
                ))
            }
            AssetId::Token(id) => id,
        };

        let to = self.ledger.sweep_address().to_string();
        if !assets.transfer(id, &to, amount) {
            log::warn!("asset ledger reported failure sweeping {} of {} to {}", amount, id, to);
        }
        Ok(())
    }

    // =========================================================================
    // Deposits and membership
    // =========================================================================

    /// Record an inbound native deposit. Passive and unauthenticated: the
    /// funds arrive through the host environment, never through the
    /// proposal workflow, and receipt needs no confirmation.
    pub fn deposit_native(&mut self, sender: Address, amount: u128) {
        log::info!("deposit of {} native from {}", amount, sender);
        self.emit(VaultEvent::Deposit { sender, amount });
    }

    /// Add members. Administrator only, all-or-nothing.
    pub fn add_members(
        &mut self,
        caller: &str,
        new_members: Vec<Address>,
    ) -> Result<(), VaultError> {
        self.registry.add_members(caller, &new_members)?;
        self.emit(VaultEvent::MembersAdded {
            members: new_members,
        });
        Ok(())
    }

    /// Remove a member. Administrator only; guarded so the current quorum
    /// threshold never exceeds the remaining member count.
    pub fn remove_member(&mut self, caller: &str, member: &str) -> Result<(), VaultError> {
        self.registry.remove_member(caller, member)?;
        self.emit(VaultEvent::MemberRemoved {
            member: member.to_string(),
        });
        Ok(())
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Whether an identity is a current member.
    pub fn is_member(&self, identity: &str) -> bool {
        self.registry.is_member(identity)
    }

    /// Whether an identity is the administrator.
    pub fn is_administrator(&self, identity: &str) -> bool {
        self.registry.is_administrator(identity)
    }

    /// The administrator identity.
    pub fn administrator(&self) -> &str {
        self.registry.administrator()
    }

    /// Current quorum threshold.
    pub fn threshold(&self) -> usize {
        self.registry.threshold()
    }

    /// Current members; order is unspecified and not stable across removals.
    pub fn members(&self) -> &[Address] {
        self.registry.members()
    }

    /// Read-only copy of a transaction record.
    pub fn transaction(&self, tx_id: usize) -> Result<VaultTransaction, VaultError> {
        self.ledger.snapshot(tx_id)
    }

    /// Number of transactions ever proposed.
    pub fn transaction_count(&self) -> usize {
        self.ledger.count()
    }

    /// The designated sweep recipient.
    pub fn sweep_address(&self) -> &str {
        self.ledger.sweep_address()
    }

    /// The vault's holdings of a fungible asset, read from the external
    /// ledger.
    pub fn asset_balance(&self, asset: &str, assets: &dyn AssetLedger) -> u128 {
        assets.balance_of(asset)
    }

    /// The full notification log, in occurrence order.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::memory::{InMemoryAssets, InMemoryBank};

    const VAULT: &str = "vault";
    const ADMIN: &str = "admin";

    fn members(names: &[&str]) -> Vec<Address> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn setup() -> (Vault, InMemoryAssets, InMemoryBank) {
        let vault = Vault::new(
            members(&["alice", "bob", "carol"]),
            ADMIN.to_string(),
            "treasury".to_string(),
        )
        .unwrap();

        let mut assets = InMemoryAssets::new(VAULT);
        assets.mint("GOLD", VAULT, 10_000);
        let mut bank = InMemoryBank::new(VAULT);
        bank.credit(VAULT, 10_000);

        (vault, assets, bank)
    }

    fn plain_events(vault: &Vault) -> Vec<VaultEvent> {
        vault.events().iter().map(|r| r.event.clone()).collect()
    }

    #[test]
    fn test_two_of_three_native_execution() {
        let (mut vault, mut assets, mut bank) = setup();
        assert_eq!(vault.threshold(), 2);

        let tx_id = vault
            .propose(ADMIN, "dora".to_string(), 100, AssetId::Native)
            .unwrap();
        assert_eq!(tx_id, 0);

        vault.confirm("alice", tx_id, &mut assets, &mut bank).unwrap();
        let tx = vault.transaction(tx_id).unwrap();
        assert_eq!(tx.confirmations, 1);
        assert!(!tx.executed);
        assert_eq!(bank.balance_of("dora"), 0);

        vault.confirm("bob", tx_id, &mut assets, &mut bank).unwrap();
        let tx = vault.transaction(tx_id).unwrap();
        assert_eq!(tx.confirmations, 2);
        assert!(tx.executed);
        assert_eq!(bank.balance_of("dora"), 100);
        assert_eq!(bank.vault_balance(), 9_900);

        // Exactly one Execute notification
        let executions = plain_events(&vault)
            .into_iter()
            .filter(|e| matches!(e, VaultEvent::Execute { .. }))
            .count();
        assert_eq!(executions, 1);

        // A third confirmation hits the terminal state
        let result = vault.confirm("carol", tx_id, &mut assets, &mut bank);
        assert!(matches!(result, Err(VaultError::AlreadyExecuted(0))));
        assert_eq!(bank.balance_of("dora"), 100);
    }

    #[test]
    fn test_token_execution_routes_through_asset_ledger() {
        let (mut vault, mut assets, mut bank) = setup();

        let tx_id = vault
            .propose(ADMIN, "dora".to_string(), 250, AssetId::Token("GOLD".to_string()))
            .unwrap();
        vault.confirm("alice", tx_id, &mut assets, &mut bank).unwrap();
        vault.confirm("carol", tx_id, &mut assets, &mut bank).unwrap();

        assert!(vault.transaction(tx_id).unwrap().executed);
        assert_eq!(assets.account_balance("GOLD", "dora"), 250);
        assert_eq!(vault.asset_balance("GOLD", &assets), 9_750);
        // Native untouched
        assert_eq!(bank.vault_balance(), 10_000);
    }

    #[test]
    fn test_failed_token_transfer_still_executes() {
        let (mut vault, mut assets, mut bank) = setup();

        // More than the vault holds; the in-memory ledger reports false.
        let tx_id = vault
            .propose(ADMIN, "dora".to_string(), 99_999, AssetId::Token("GOLD".to_string()))
            .unwrap();
        vault.confirm("alice", tx_id, &mut assets, &mut bank).unwrap();
        vault.confirm("bob", tx_id, &mut assets, &mut bank).unwrap();

        let tx = vault.transaction(tx_id).unwrap();
        assert!(tx.executed);
        assert_eq!(assets.account_balance("GOLD", "dora"), 0);
        assert!(plain_events(&vault).contains(&VaultEvent::Execute { tx_id }));
    }

    #[test]
    fn test_failed_native_send_surfaces_error_after_state_flip() {
        let (mut vault, mut assets, mut bank) = setup();

        let tx_id = vault
            .propose(ADMIN, "dora".to_string(), 99_999, AssetId::Native)
            .unwrap();
        vault.confirm("alice", tx_id, &mut assets, &mut bank).unwrap();
        let result = vault.confirm("bob", tx_id, &mut assets, &mut bank);

        assert!(matches!(result, Err(VaultError::NativeSend(_))));
        // Commit-before-call ordering: the record is terminal regardless.
        assert!(vault.transaction(tx_id).unwrap().executed);
        assert!(!plain_events(&vault).contains(&VaultEvent::Execute { tx_id }));
    }

    #[test]
    fn test_propose_requires_administrator() {
        let (mut vault, _, _) = setup();
        let result = vault.propose("alice", "dora".to_string(), 1, AssetId::Native);
        assert!(matches!(result, Err(VaultError::Unauthorized)));
        assert_eq!(vault.transaction_count(), 0);
    }

    #[test]
    fn test_confirm_requires_membership_and_valid_index() {
        let (mut vault, mut assets, mut bank) = setup();
        vault
            .propose(ADMIN, "dora".to_string(), 1, AssetId::Native)
            .unwrap();

        assert!(matches!(
            vault.confirm("mallory", 0, &mut assets, &mut bank),
            Err(VaultError::NotAMember(_))
        ));
        // The administrator is not a member here either
        assert!(matches!(
            vault.confirm(ADMIN, 0, &mut assets, &mut bank),
            Err(VaultError::NotAMember(_))
        ));
        assert!(matches!(
            vault.confirm("alice", 9, &mut assets, &mut bank),
            Err(VaultError::InvalidIndex(9))
        ));
    }

    #[test]
    fn test_live_threshold_reread_after_members_added() {
        let (mut vault, mut assets, mut bank) = setup();

        let tx_id = vault
            .propose(ADMIN, "dora".to_string(), 100, AssetId::Native)
            .unwrap();
        vault.confirm("alice", tx_id, &mut assets, &mut bank).unwrap();

        // Growing the pool to 5 raises the quorum from 2 to 4; bob's
        // confirmation no longer completes the transaction.
        vault
            .add_members(ADMIN, members(&["dave", "erin"]))
            .unwrap();
        assert_eq!(vault.threshold(), 4);

        vault.confirm("bob", tx_id, &mut assets, &mut bank).unwrap();
        assert!(!vault.transaction(tx_id).unwrap().executed);

        vault.confirm("carol", tx_id, &mut assets, &mut bank).unwrap();
        vault.confirm("dave", tx_id, &mut assets, &mut bank).unwrap();
        assert!(vault.transaction(tx_id).unwrap().executed);
        assert_eq!(bank.balance_of("dora"), 100);
    }

    #[test]
    fn test_removal_scenario_five_members() {
        let mut vault = Vault::new(
            members(&["a", "b", "c", "d", "e"]),
            ADMIN.to_string(),
            "treasury".to_string(),
        )
        .unwrap();
        assert_eq!(vault.threshold(), 4);

        // Removing one leaves 4 members with the pre-removal quorum of 4:
        // allowed, then the quorum recomputes to 3.
        vault.remove_member(ADMIN, "b").unwrap();
        assert_eq!(vault.threshold(), 3);
        assert_eq!(vault.members().len(), 4);
    }

    #[test]
    fn test_removal_quorum_violation_scenario() {
        let (mut vault, _, _) = setup();

        vault.remove_member(ADMIN, "carol").unwrap();
        // Two members left, quorum still 2; another removal would strand it.
        let result = vault.remove_member(ADMIN, "bob");
        assert!(matches!(result, Err(VaultError::QuorumViolation { .. })));
        assert!(vault.is_member("bob"));
    }

    #[test]
    fn test_removed_member_cannot_confirm_but_old_votes_stand() {
        let mut vault = Vault::new(
            members(&["a", "b", "c", "d", "e"]),
            ADMIN.to_string(),
            "treasury".to_string(),
        )
        .unwrap();
        let mut assets = InMemoryAssets::new(VAULT);
        let mut bank = InMemoryBank::new(VAULT);
        bank.credit(VAULT, 1_000);

        let tx_id = vault
            .propose(ADMIN, "x".to_string(), 10, AssetId::Native)
            .unwrap();
        vault.confirm("a", tx_id, &mut assets, &mut bank).unwrap();
        vault.remove_member(ADMIN, "a").unwrap();

        // The recorded confirmation survives the removal.
        assert_eq!(vault.transaction(tx_id).unwrap().confirmations, 1);
        // But the removed member can no longer act.
        assert!(matches!(
            vault.confirm("a", tx_id, &mut assets, &mut bank),
            Err(VaultError::NotAMember(_))
        ));

        // Quorum dropped to 3; two more distinct confirmations finish it.
        assert_eq!(vault.threshold(), 3);
        vault.confirm("b", tx_id, &mut assets, &mut bank).unwrap();
        vault.confirm("c", tx_id, &mut assets, &mut bank).unwrap();
        assert!(vault.transaction(tx_id).unwrap().executed);
    }

    #[test]
    fn test_sweeps() {
        let (mut vault, mut assets, mut bank) = setup();

        vault.sweep_native(ADMIN, 500, &mut bank).unwrap();
        assert_eq!(bank.balance_of("treasury"), 500);

        vault
            .sweep_asset(ADMIN, 300, &AssetId::Token("GOLD".to_string()), &mut assets)
            .unwrap();
        assert_eq!(assets.account_balance("GOLD", "treasury"), 300);

        // Sweeps bypass the workflow and emit nothing.
        assert!(plain_events(&vault).is_empty());
    }

    #[test]
    fn test_sweep_authorization_and_sentinel() {
        let (mut vault, mut assets, mut bank) = setup();

        assert!(matches!(
            vault.sweep_native("alice", 1, &mut bank),
            Err(VaultError::Unauthorized)
        ));
        assert!(matches!(
            vault.sweep_asset("alice", 1, &AssetId::Token("GOLD".to_string()), &mut assets),
            Err(VaultError::Unauthorized)
        ));
        assert!(matches!(
            vault.sweep_asset(ADMIN, 1, &AssetId::Native, &mut assets),
            Err(VaultError::InvalidInput(_))
        ));
        assert!(matches!(
            vault.sweep_asset(ADMIN, 1, &AssetId::Token(String::new()), &mut assets),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_deposit_records_event_only() {
        let (mut vault, _, _) = setup();

        vault.deposit_native("anyone".to_string(), 777);
        assert_eq!(
            plain_events(&vault),
            vec![VaultEvent::Deposit {
                sender: "anyone".to_string(),
                amount: 777
            }]
        );
        assert_eq!(vault.transaction_count(), 0);
    }

    #[test]
    fn test_event_ordering_through_a_full_flow() {
        let (mut vault, mut assets, mut bank) = setup();

        vault.deposit_native("funder".to_string(), 1_000);
        let tx_id = vault
            .propose(ADMIN, "dora".to_string(), 100, AssetId::Native)
            .unwrap();
        vault.confirm("alice", tx_id, &mut assets, &mut bank).unwrap();
        vault.confirm("bob", tx_id, &mut assets, &mut bank).unwrap();

        let kinds: Vec<VaultEvent> = plain_events(&vault);
        assert_eq!(
            kinds,
            vec![
                VaultEvent::Deposit {
                    sender: "funder".to_string(),
                    amount: 1_000
                },
                VaultEvent::Submit {
                    tx_id,
                    asset: AssetId::Native
                },
                VaultEvent::Confirm {
                    member: "alice".to_string(),
                    tx_id
                },
                VaultEvent::Confirm {
                    member: "bob".to_string(),
                    tx_id
                },
                VaultEvent::Execute { tx_id },
            ]
        );
    }

    #[test]
    fn test_failed_operation_leaves_state_unchanged() {
        let (mut vault, mut assets, mut bank) = setup();
        let tx_id = vault
            .propose(ADMIN, "dora".to_string(), 100, AssetId::Native)
            .unwrap();
        vault.confirm("alice", tx_id, &mut assets, &mut bank).unwrap();

        let snapshot = vault.transaction(tx_id).unwrap();
        let events_before = vault.events().len();

        // Duplicate confirmation fails and changes nothing.
        let result = vault.confirm("alice", tx_id, &mut assets, &mut bank);
        assert!(matches!(result, Err(VaultError::AlreadyConfirmed { .. })));
        assert_eq!(vault.transaction(tx_id).unwrap(), snapshot);
        assert_eq!(vault.events().len(), events_before);
    }

    #[test]
    fn test_construction_rejects_null_sweep_address() {
        let result = Vault::new(
            members(&["a", "b", "c"]),
            ADMIN.to_string(),
            String::new(),
        );
        assert!(matches!(result, Err(VaultError::InvalidConfiguration(_))));
    }
}
