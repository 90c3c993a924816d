//! Shared fixtures for ledger tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use crate::adapters::InMemoryKVStore;
use crate::domain::config::LedgerConfig;
use crate::domain::entities::Timestamp;
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult, TimeSource};
use crate::service::{BondLedgerDependencies, BondLedgerService};

/// 2023-11-14T22:13:20Z
pub const T0: Timestamp = 1_700_000_000;

pub const ONE_DAY: Timestamp = 86_400;

/// Clock frozen at a settable instant. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    now: Arc<AtomicI64>,
}

impl FixedTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: Timestamp) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// In-memory store whose writes can be switched to fail.
/// Clones share the same switch.
#[derive(Debug, Clone, Default)]
pub struct FailingKVStore {
    inner: InMemoryKVStore,
    fail_writes: Arc<AtomicBool>,
}

impl FailingKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), KVStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KVStoreError::Rejected {
                message: "injected write failure".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FailingKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.check()?;
        self.inner.put(key, value)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.check()?;
        self.inner.atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.inner.exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        self.inner.prefix_scan(prefix)
    }
}

/// Self-signed certificate for `name`, PEM encoded. Every call yields a
/// fresh key pair, so two calls never produce the same certificate.
pub fn generate_certificate_pem(name: &str) -> String {
    let certified = rcgen::generate_simple_self_signed(vec![name.to_string()])
        .expect("certificate generation");
    certified.cert.pem()
}

/// Service over an in-memory store and a clock frozen at `T0`.
pub fn make_test_service(
    config: LedgerConfig,
) -> (BondLedgerService<InMemoryKVStore, FixedTimeSource>, FixedTimeSource) {
    let clock = FixedTimeSource::new(T0);
    let deps = BondLedgerDependencies {
        kv_store: InMemoryKVStore::new(),
        time_source: clock.clone(),
    };
    (BondLedgerService::new(deps, config), clock)
}
