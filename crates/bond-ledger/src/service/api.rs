//! # Bond Ledger API Implementation
//!
//! Implements the BondLedgerApi trait on top of the ledger and log
//! operations.

use super::BondLedgerService;
use crate::domain::entities::{Bond, LedgerStatus, Transaction};
use crate::domain::errors::LedgerError;
use crate::domain::identity::InvocationContext;
use crate::domain::keys::{BondId, TransactionId};
use crate::ports::inbound::{BondLedgerApi, MintRequest};
use crate::ports::outbound::{KeyValueStore, TimeSource};

impl<KV, TS> BondLedgerApi for BondLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    fn init_ledger(&mut self) -> Result<LedgerStatus, LedgerError> {
        self.initialize_ledger()
    }

    fn mint(
        &mut self,
        ctx: &InvocationContext,
        request: MintRequest,
    ) -> Result<Vec<BondId>, LedgerError> {
        // INVARIANT-6: verify before any state access
        self.authorize_mint(ctx)?;

        if let Some(owner) = request.owner.as_deref() {
            if owner != self.config.issuer_label {
                tracing::debug!(
                    "[bond-ledger] Requested owner {:?} ignored, minted bonds go to {:?}",
                    owner,
                    self.config.issuer_label
                );
            }
        }

        self.mint_bonds(&request)
    }

    fn buy_bond(&mut self, id: &str, new_owner: &str) -> Result<TransactionId, LedgerError> {
        self.transfer_bond(id, new_owner)
    }

    fn get_bond(&self, id: &str) -> Result<Bond, LedgerError> {
        self.load_bond(id)
    }

    fn get_transaction(&self, id: &str) -> Result<Transaction, LedgerError> {
        self.load_transaction(id)
    }

    fn ledger_status(&self) -> Result<LedgerStatus, LedgerError> {
        self.load_status()
    }

    fn bond_history(&self, id: &str) -> Result<Vec<Transaction>, LedgerError> {
        self.collect_history(id)
    }
}
