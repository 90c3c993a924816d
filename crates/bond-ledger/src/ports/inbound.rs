//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the Bond Ledger.

use crate::domain::entities::{Bond, LedgerStatus, Timestamp, Transaction};
use crate::domain::errors::LedgerError;
use crate::domain::identity::InvocationContext;
use crate::domain::keys::{BondId, TransactionId};

/// Arguments of a mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    /// Number of bonds to create.
    pub count: i64,
    /// Face value of each bond.
    pub amount: i64,
    /// Requested owner. Minted bonds always go to the configured issuer
    /// label; this is accepted for invocation compatibility only.
    pub owner: Option<String>,
    /// Expiry of every bond in the batch.
    pub expiry: Timestamp,
}

impl MintRequest {
    pub fn new(count: i64, amount: i64, expiry: Timestamp) -> Self {
        Self {
            count,
            amount,
            owner: None,
            expiry,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

/// Primary API of the Bond Ledger.
///
/// Every mutating operation is one atomic unit: all records and counters it
/// writes commit together or not at all (INVARIANT-4).
pub trait BondLedgerApi {
    /// Write the configured seed bonds and reset both counters.
    ///
    /// Not idempotent: a second call overwrites the seeded ids and resets
    /// `B_num` and `T_num`. Invoke at most once per ledger.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: A seed bond violates a bond invariant
    /// - `StoreWriteFailure`: The store rejected the batch
    fn init_ledger(&mut self) -> Result<LedgerStatus, LedgerError>;

    /// Create `count` bonds owned by the issuer, each with a paired mint
    /// transaction.
    ///
    /// ## Authorization (INVARIANT-6)
    ///
    /// With an enforced policy the caller certificate is checked before any
    /// ledger state is read or written.
    ///
    /// ## Errors
    ///
    /// - `Unauthorized`: Caller is not the issuer
    /// - `MalformedCertificate`: Caller or issuer PEM does not decode
    /// - `InvalidArgument`: Non-positive count/amount, count above the limit,
    ///   or expiry not after now
    /// - `CounterMissing`: Ledger not initialized
    /// - `StoreWriteFailure`: The store rejected the batch
    fn mint(
        &mut self,
        ctx: &InvocationContext,
        request: MintRequest,
    ) -> Result<Vec<BondId>, LedgerError>;

    /// Transfer bond `id` to `new_owner`, returning the new transaction id.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: No bond under `id`
    /// - `Expired`: Bond expiry lies before now (INVARIANT-5)
    /// - `InvalidArgument`: Empty `new_owner`
    /// - `CounterMissing`: Ledger not initialized
    /// - `StoreWriteFailure`: The store rejected the batch
    fn buy_bond(&mut self, id: &str, new_owner: &str) -> Result<TransactionId, LedgerError>;

    /// Read a bond.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: No bond under `id`
    fn get_bond(&self, id: &str) -> Result<Bond, LedgerError>;

    /// Read a transaction.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: No transaction under `id`
    fn get_transaction(&self, id: &str) -> Result<Transaction, LedgerError>;

    /// Current values of both counters.
    ///
    /// ## Errors
    ///
    /// - `CounterMissing`: Ledger not initialized
    fn ledger_status(&self) -> Result<LedgerStatus, LedgerError>;

    /// All transactions that touched bond `id`: the mint record first (seeded
    /// bonds have none), then transfers in sequence order.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: No bond under `id`
    fn bond_history(&self, id: &str) -> Result<Vec<Transaction>, LedgerError>;
}
