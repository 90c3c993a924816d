//! # Bond Ledger Service
//!
//! The main service implementing the Bond Ledger API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `BondLedgerApi` (initialize, mint, transfer, reads)
//! 2. Stages every write of an operation in `StagedWrites` and commits it
//!    with one `atomic_batch_write` (INVARIANT-4)
//! 3. Gates mint on the issuer certificate before touching state (INVARIANT-6)
//! 4. Uses dependency injection for the store and the clock

mod api;
mod counters;
pub mod dispatch;
mod helpers;
mod ledger;
mod staged;
mod tx_log;

pub use counters::{read_counter, write_counter, Counters};
pub use staged::StagedWrites;

use crate::adapters::{InMemoryKVStore, SystemTimeSource};
use crate::domain::config::LedgerConfig;
use crate::ports::outbound::{KeyValueStore, TimeSource};

/// The Bond Ledger Service.
pub struct BondLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// State store holding bonds, transactions and counters.
    pub(crate) kv_store: KV,
    /// Clock for issue, expiry and transaction times.
    pub(crate) time_source: TS,
    /// Service configuration.
    pub(crate) config: LedgerConfig,
}

/// Dependencies for BondLedgerService
pub struct BondLedgerDependencies<KV, TS> {
    pub kv_store: KV,
    pub time_source: TS,
}

impl<KV, TS> BondLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Create a new service with the given dependencies.
    pub fn new(deps: BondLedgerDependencies<KV, TS>, config: LedgerConfig) -> Self {
        tracing::debug!(
            "[bond-ledger] Service created (mint authorization {})",
            if config.authorization.is_enforced() {
                "enforced"
            } else {
                "disabled"
            }
        );
        Self {
            kv_store: deps.kv_store,
            time_source: deps.time_source,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &KV {
        &self.kv_store
    }

    /// Consume the service, returning the store.
    pub fn into_store(self) -> KV {
        self.kv_store
    }
}

impl BondLedgerService<InMemoryKVStore, SystemTimeSource> {
    /// Service over a fresh in-memory store and the system clock.
    pub fn new_in_memory(config: LedgerConfig) -> Self {
        Self::new(
            BondLedgerDependencies {
                kv_store: InMemoryKVStore::new(),
                time_source: SystemTimeSource,
            },
            config,
        )
    }
}
