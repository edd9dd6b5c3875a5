//! External asset interfaces
//!
//! The vault moves funds only through capabilities supplied by its host:
//! a fungible-asset ledger and a native-currency bank. This module defines
//! those capability traits plus in-memory implementations used by the CLI
//! and the test suite.
//!
//! # Example
//!
//! ```ignore
//! use quorum_vault::asset::{AssetLedger, InMemoryAssets};
//!
//! let mut assets = InMemoryAssets::new("vault");
//! assets.mint("GOLD", "vault", 1_000);
//!
//! assert!(assets.transfer("GOLD", "alice", 250));
//! assert_eq!(assets.balance_of("GOLD"), 750);
//! ```

pub mod host;
pub mod memory;

pub use host::{AssetLedger, NativeCurrency, NativeSendError};
pub use memory::{InMemoryAssets, InMemoryBank};
