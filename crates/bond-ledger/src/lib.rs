//! # Bond Ledger
//!
//! Asset lifecycle and transaction recording for a ledger of fungible bonds,
//! backed by an external key-value state store.
//!
//! ## Operations
//!
//! ```text
//! InitLedger ──→ seed bonds b_1..b_n, B_num = n, T_num = 0
//! mint       ──→ [issuer check] → b_<i> + transaction<i> for each new i
//! buyBond    ──→ [expiry check] → bond.owner = buyer, t_<T_num+1>
//! getBond / getTransaction / status / history   (read-only)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Bond Count | `B_num` equals the number of bond records |
//! | 2 | Transaction Count | `T_num` equals the number of transaction records |
//! | 3 | Unique Identifiers | Bond and transaction ids are never reused |
//! | 4 | Atomic Operations | Records and counters of one operation commit together |
//! | 5 | Expiry | A bond past its expiry cannot change hands |
//! | 6 | Issuer Gate | Mint is refused before any write when the caller is not the issuer |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Records, identifiers, configuration, errors, identity check
//! - `ports/` - Inbound API and outbound store/clock traits
//! - `adapters/` - In-memory and file-backed stores, system clock
//! - `service/` - `BondLedgerService`, counters, ledger and log operations
//!
//! ## Usage
//!
//! ```ignore
//! use bond_ledger::{BondLedgerApi, BondLedgerService, InvocationContext, LedgerConfig, MintRequest};
//!
//! let mut service = BondLedgerService::new_in_memory(LedgerConfig::default());
//! let ctx = InvocationContext::anonymous();
//!
//! service.init_ledger()?;
//! service.mint(&ctx, MintRequest::new(2, 500, now + 86_400))?;
//! let tx_id = service.buy_bond("b_1", "Alice")?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export key types for convenience
pub use domain::config::{AuthorizationPolicy, ConfigError, LedgerConfig, SeedBond};
pub use domain::entities::{Bond, LedgerStatus, Timestamp, Transaction};
pub use domain::errors::{KVStoreError, LedgerError, RecordKind};
pub use domain::identity::{verify, InvocationContext, IssuerCertificate};
pub use domain::keys::{BondId, Counter, TransactionId};
pub use ports::inbound::{BondLedgerApi, MintRequest};
pub use ports::outbound::{BatchOperation, KeyValueStore, TimeSource};
pub use service::dispatch::{LedgerCommand, LedgerResponse};
pub use service::{BondLedgerDependencies, BondLedgerService};

pub use adapters::{FileBackedKVStore, InMemoryKVStore, SystemTimeSource};
