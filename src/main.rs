//! Quorum-Vault CLI
//!
//! A command-line interface for driving a vault backed by in-memory asset
//! hosts, persisted between invocations as JSON.

use clap::{Parser, Subcommand};
use quorum_vault::asset::{InMemoryAssets, InMemoryBank};
use quorum_vault::storage::{StorageConfig, VaultState, VaultStore};
use quorum_vault::vault::{AssetId, Vault, VaultEvent};
use std::path::PathBuf;

/// Result type for CLI operations
type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "vault")]
#[command(version = "0.1.0")]
#[command(about = "Threshold-signature custody vault", long_about = None)]
struct Cli {
    /// Data directory for vault state
    #[arg(short, long, default_value = ".vault_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new vault
    Init {
        /// Initial members, comma-separated (at least 3)
        #[arg(short, long)]
        members: String,

        /// Administrator identity
        #[arg(short, long)]
        admin: String,

        /// Designated sweep recipient
        #[arg(short, long)]
        sweep_to: String,
    },

    /// Record a native deposit into the vault
    Deposit {
        /// Sender identity
        #[arg(short, long)]
        from: String,

        /// Amount of native currency
        #[arg(short, long)]
        amount: u128,
    },

    /// Credit fungible tokens to the vault's holdings (test helper)
    Mint {
        /// Asset identifier
        #[arg(long)]
        asset: String,

        /// Amount to credit
        #[arg(short, long)]
        amount: u128,
    },

    /// Propose a transfer out of the vault
    Propose {
        /// Recipient identity
        #[arg(short, long)]
        to: String,

        /// Amount to transfer
        #[arg(short, long)]
        amount: u128,

        /// Asset identifier; omit for native currency
        #[arg(long)]
        asset: Option<String>,

        /// Caller identity; defaults to the administrator
        #[arg(short, long)]
        caller: Option<String>,
    },

    /// Confirm a pending transaction as a member
    Confirm {
        /// Confirming member
        #[arg(short, long)]
        member: String,

        /// Transaction index
        #[arg(short, long)]
        tx: usize,
    },

    /// Transaction queries
    Tx {
        #[command(subcommand)]
        action: TxCommands,
    },

    /// Membership operations
    Members {
        #[command(subcommand)]
        action: MemberCommands,
    },

    /// Sweep funds to the designated address, bypassing quorum
    Sweep {
        /// Amount to sweep
        #[arg(short, long)]
        amount: u128,

        /// Asset identifier; omit for native currency
        #[arg(long)]
        asset: Option<String>,

        /// Caller identity; defaults to the administrator
        #[arg(short, long)]
        caller: Option<String>,
    },

    /// Show the vault's balances
    Balance {
        /// Asset identifier; omit for native currency
        #[arg(long)]
        asset: Option<String>,
    },

    /// Show the notification log
    Events,

    /// Show vault status
    Status,
}

#[derive(Subcommand)]
enum TxCommands {
    /// List all transactions
    List,
    /// Show one transaction
    Info {
        /// Transaction index
        #[arg(short, long)]
        id: usize,
    },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// List current members
    List,
    /// Add members, comma-separated
    Add {
        /// New members
        #[arg(long)]
        add: String,

        /// Caller identity; defaults to the administrator
        #[arg(short, long)]
        caller: Option<String>,
    },
    /// Remove a member
    Remove {
        /// Member to remove
        #[arg(long)]
        member: String,

        /// Caller identity; defaults to the administrator
        #[arg(short, long)]
        caller: Option<String>,
    },
}

fn main() -> CliResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = VaultStore::new(StorageConfig {
        data_dir: cli.data_dir.clone(),
        ..Default::default()
    })?;

    match cli.command {
        Commands::Init {
            members,
            admin,
            sweep_to,
        } => {
            if store.exists() {
                println!("❌ A vault already exists in {}", cli.data_dir.display());
                return Ok(());
            }

            let members: Vec<String> = split_list(&members);
            let vault = Vault::new(members, admin, sweep_to)?;
            println!(
                "✅ Vault created: {} members, quorum {}",
                vault.members().len(),
                vault.threshold()
            );

            let state = VaultState {
                vault,
                assets: InMemoryAssets::new("vault"),
                bank: InMemoryBank::new("vault"),
            };
            store.save(&state)?;
        }

        Commands::Deposit { from, amount } => {
            let mut state = store.load()?;
            state.bank.credit("vault", amount);
            state.vault.deposit_native(from.clone(), amount);
            store.save(&state)?;
            println!("✅ Deposited {} native from {}", amount, from);
            println!("   Vault balance: {}", state.bank.vault_balance());
        }

        Commands::Mint { asset, amount } => {
            let mut state = store.load()?;
            state.assets.mint(&asset, "vault", amount);
            store.save(&state)?;
            println!("✅ Minted {} of {} to the vault", amount, asset);
        }

        Commands::Propose {
            to,
            amount,
            asset,
            caller,
        } => {
            let mut state = store.load()?;
            let caller = caller.unwrap_or_else(|| admin_of(&state.vault));
            let asset = parse_asset(asset);

            let tx_id = state.vault.propose(&caller, to.clone(), amount, asset)?;
            store.save(&state)?;
            println!("✅ Transaction {} proposed: {} -> {}", tx_id, amount, to);
            println!(
                "   Needs {} confirmations from {} members",
                state.vault.threshold(),
                state.vault.members().len()
            );
        }

        Commands::Confirm { member, tx } => {
            let mut state = store.load()?;
            let VaultState {
                vault,
                assets,
                bank,
            } = &mut state;

            // Confirmation can commit an execution and then fail on the
            // native send; persist whatever state was committed either way.
            let result = vault.confirm(&member, tx, assets, bank);
            let record = vault.transaction(tx);
            store.save(&state)?;
            result?;
            let record = record?;

            if record.executed {
                println!("✅ Transaction {} confirmed by {} and executed!", tx, member);
            } else {
                println!(
                    "✅ Transaction {} confirmed by {} ({} confirmations so far)",
                    tx, member, record.confirmations
                );
            }
        }

        Commands::Tx { action } => {
            let state = store.load()?;
            match action {
                TxCommands::List => {
                    if state.vault.transaction_count() == 0 {
                        println!("📭 No transactions proposed yet.");
                    } else {
                        println!("📋 Transactions ({}):", state.vault.transaction_count());
                        for id in 0..state.vault.transaction_count() {
                            let tx = state.vault.transaction(id)?;
                            let status = if tx.executed { "executed" } else { "pending" };
                            println!(
                                "   #{} {} -> {} ({}) [{}] {} confirmations",
                                id, tx.amount, tx.to, tx.asset, status, tx.confirmations
                            );
                        }
                    }
                }
                TxCommands::Info { id } => {
                    let tx = state.vault.transaction(id)?;
                    println!("📋 Transaction #{}", id);
                    println!("   To: {}", tx.to);
                    println!("   Amount: {}", tx.amount);
                    println!("   Asset: {}", tx.asset);
                    println!("   Confirmations: {}", tx.confirmations);
                    println!("   Executed: {}", tx.executed);
                    println!("   Proposed at: {}", tx.created_at);
                }
            }
        }

        Commands::Members { action } => match action {
            MemberCommands::List => {
                let state = store.load()?;
                println!(
                    "👥 Members ({}), quorum {}:",
                    state.vault.members().len(),
                    state.vault.threshold()
                );
                for member in state.vault.members() {
                    println!("   {}", member);
                }
            }
            MemberCommands::Add { add, caller } => {
                let mut state = store.load()?;
                let caller = caller.unwrap_or_else(|| admin_of(&state.vault));
                let new_members = split_list(&add);
                let added = new_members.len();

                state.vault.add_members(&caller, new_members)?;
                store.save(&state)?;
                println!(
                    "✅ Added {} members, quorum now {}",
                    added,
                    state.vault.threshold()
                );
            }
            MemberCommands::Remove { member, caller } => {
                let mut state = store.load()?;
                let caller = caller.unwrap_or_else(|| admin_of(&state.vault));

                state.vault.remove_member(&caller, &member)?;
                store.save(&state)?;
                println!(
                    "✅ Removed {}, quorum now {}",
                    member,
                    state.vault.threshold()
                );
            }
        },

        Commands::Sweep {
            amount,
            asset,
            caller,
        } => {
            let mut state = store.load()?;
            let caller = caller.unwrap_or_else(|| admin_of(&state.vault));
            let target = state.vault.sweep_address().to_string();

            match parse_asset(asset) {
                AssetId::Native => {
                    let VaultState { vault, bank, .. } = &mut state;
                    vault.sweep_native(&caller, amount, bank)?;
                    println!("✅ Swept {} native to {}", amount, target);
                }
                asset => {
                    let VaultState { vault, assets, .. } = &mut state;
                    vault.sweep_asset(&caller, amount, &asset, assets)?;
                    println!("✅ Swept {} of {} to {}", amount, asset, target);
                }
            }
            store.save(&state)?;
        }

        Commands::Balance { asset } => {
            let state = store.load()?;
            match asset {
                None => println!("💰 Native balance: {}", state.bank.vault_balance()),
                Some(id) => println!(
                    "💰 {} balance: {}",
                    id,
                    state.vault.asset_balance(&id, &state.assets)
                ),
            }
        }

        Commands::Events => {
            let state = store.load()?;
            if state.vault.events().is_empty() {
                println!("📭 No events recorded yet.");
            } else {
                println!("📜 Events ({}):", state.vault.events().len());
                for record in state.vault.events() {
                    println!("   [{}] {}", record.at, describe(&record.event));
                }
            }
        }

        Commands::Status => {
            let state = store.load()?;
            println!("🏦 Vault status");
            println!("   Members: {}", state.vault.members().len());
            println!("   Quorum: {}", state.vault.threshold());
            println!("   Transactions: {}", state.vault.transaction_count());
            println!("   Sweep address: {}", state.vault.sweep_address());
            println!("   Native balance: {}", state.bank.vault_balance());
            println!("   Events: {}", state.vault.events().len());
        }
    }

    Ok(())
}

/// Split a comma-separated identity list, dropping surrounding whitespace.
fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Map an optional CLI asset argument onto the asset identifier.
fn parse_asset(asset: Option<String>) -> AssetId {
    match asset {
        None => AssetId::Native,
        Some(id) => AssetId::Token(id),
    }
}

/// The vault's administrator identity, used as the default caller.
fn admin_of(vault: &Vault) -> String {
    vault.administrator().to_string()
}

/// One-line rendering of a notification.
fn describe(event: &VaultEvent) -> String {
    match event {
        VaultEvent::Deposit { sender, amount } => {
            format!("Deposit: {} native from {}", amount, sender)
        }
        VaultEvent::Submit { tx_id, asset } => format!("Submit: tx {} ({})", tx_id, asset),
        VaultEvent::Confirm { member, tx_id } => format!("Confirm: {} on tx {}", member, tx_id),
        VaultEvent::Execute { tx_id } => format!("Execute: tx {}", tx_id),
        VaultEvent::MembersAdded { members } => format!("MembersAdded: {}", members.join(", ")),
        VaultEvent::MemberRemoved { member } => format!("MemberRemoved: {}", member),
    }
}
