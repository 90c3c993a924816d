//! # Command Dispatch
//!
//! The closed set of operations a caller can invoke, resolved by an
//! exhaustive `match` instead of looking methods up by name.
//!
//! Commands deserialize from JSON tagged by `op`, using the invocation names
//! of the ledger:
//!
//! ```text
//! {"op":"InitLedger"}
//! {"op":"mint","count":2,"amount":500,"owner":"Government","expiry":1700086400}
//! {"op":"buyBond","id":"b_1","newOwner":"Alice"}
//! {"op":"getBond","id":"b_1"}
//! {"op":"getTransaction","id":"t_1"}
//! {"op":"ledgerStatus"}
//! {"op":"bondHistory","id":"b_1"}
//! ```

use serde::{Deserialize, Serialize};

use super::BondLedgerService;
use crate::domain::entities::{Bond, LedgerStatus, Timestamp, Transaction};
use crate::domain::errors::LedgerError;
use crate::domain::identity::InvocationContext;
use crate::domain::keys::{BondId, TransactionId};
use crate::ports::inbound::{BondLedgerApi, MintRequest};
use crate::ports::outbound::{KeyValueStore, TimeSource};

/// An operation exposed by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum LedgerCommand {
    #[serde(rename = "InitLedger")]
    InitLedger,
    #[serde(rename = "mint")]
    Mint {
        count: i64,
        amount: i64,
        #[serde(default)]
        owner: Option<String>,
        expiry: Timestamp,
    },
    #[serde(rename = "buyBond")]
    BuyBond {
        id: String,
        #[serde(rename = "newOwner")]
        new_owner: String,
    },
    #[serde(rename = "getBond")]
    GetBond { id: String },
    #[serde(rename = "getTransaction")]
    GetTransaction { id: String },
    #[serde(rename = "ledgerStatus")]
    LedgerStatus,
    #[serde(rename = "bondHistory")]
    BondHistory { id: String },
}

impl LedgerCommand {
    /// Invocation name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::InitLedger => "InitLedger",
            LedgerCommand::Mint { .. } => "mint",
            LedgerCommand::BuyBond { .. } => "buyBond",
            LedgerCommand::GetBond { .. } => "getBond",
            LedgerCommand::GetTransaction { .. } => "getTransaction",
            LedgerCommand::LedgerStatus => "ledgerStatus",
            LedgerCommand::BondHistory { .. } => "bondHistory",
        }
    }

    /// Whether the command writes to the store.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            LedgerCommand::InitLedger | LedgerCommand::Mint { .. } | LedgerCommand::BuyBond { .. }
        )
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum LedgerResponse {
    Initialized(LedgerStatus),
    Minted(Vec<BondId>),
    TransactionRecorded(TransactionId),
    Bond(Bond),
    Transaction(Transaction),
    Status(LedgerStatus),
    History(Vec<Transaction>),
}

impl<KV, TS> BondLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Execute one command as one atomic invocation.
    pub fn execute(
        &mut self,
        ctx: &InvocationContext,
        command: LedgerCommand,
    ) -> Result<LedgerResponse, LedgerError> {
        let name = command.name();
        tracing::debug!("[bond-ledger] Executing {}", name);

        let result = match command {
            LedgerCommand::InitLedger => self.init_ledger().map(LedgerResponse::Initialized),
            LedgerCommand::Mint {
                count,
                amount,
                owner,
                expiry,
            } => {
                let request = MintRequest {
                    count,
                    amount,
                    owner,
                    expiry,
                };
                self.mint(ctx, request).map(LedgerResponse::Minted)
            }
            LedgerCommand::BuyBond { id, new_owner } => self
                .buy_bond(&id, &new_owner)
                .map(LedgerResponse::TransactionRecorded),
            LedgerCommand::GetBond { id } => self.get_bond(&id).map(LedgerResponse::Bond),
            LedgerCommand::GetTransaction { id } => {
                self.get_transaction(&id).map(LedgerResponse::Transaction)
            }
            LedgerCommand::LedgerStatus => self.ledger_status().map(LedgerResponse::Status),
            LedgerCommand::BondHistory { id } => {
                self.bond_history(&id).map(LedgerResponse::History)
            }
        };

        if let Err(e) = &result {
            tracing::debug!("[bond-ledger] {} failed: {}", name, e);
        }
        result
    }
}
