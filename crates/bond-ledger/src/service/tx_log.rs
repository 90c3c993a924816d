//! # Transaction Log
//!
//! Read-only access to transaction records. Transactions are written only by
//! the asset ledger and never modified afterwards.

use super::helpers::{decode_record, read_record};
use super::BondLedgerService;
use crate::domain::entities::Transaction;
use crate::domain::errors::LedgerError;
use crate::domain::keys::{BondId, KeyPrefix, TransactionId};
use crate::ports::outbound::{KeyValueStore, TimeSource};

impl<KV, TS> BondLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Committed transaction under `id`.
    pub(crate) fn load_transaction(&self, id: &str) -> Result<Transaction, LedgerError> {
        let tx_id =
            TransactionId::parse(id).ok_or_else(|| LedgerError::transaction_not_found(id))?;
        tracing::debug!("[bond-ledger] Reading {}", tx_id);
        read_record(&self.kv_store, &tx_id.to_string())?
            .ok_or_else(|| LedgerError::transaction_not_found(id))
    }

    /// Mint record of bond `id` (if any), then its transfers by sequence.
    pub(crate) fn collect_history(&self, id: &str) -> Result<Vec<Transaction>, LedgerError> {
        let bond = self.load_bond(id)?;
        let mut history = Vec::new();

        // Seeded bonds were never minted and have no mint record.
        if let Some(bond_id) = BondId::parse(&bond.id) {
            let mint_key = bond_id.mint_transaction().to_string();
            if let Some(mint) = read_record::<_, Transaction>(&self.kv_store, &mint_key)? {
                history.push(mint);
            }
        }

        let prefix = KeyPrefix::TransferTransaction.as_str();
        let mut transfers = Vec::new();
        for (key, value) in self
            .kv_store
            .prefix_scan(prefix.as_bytes())
            .map_err(LedgerError::store_read)?
        {
            let key = String::from_utf8_lossy(&key);
            let Some(TransactionId::Transfer(sequence)) = TransactionId::parse(&key) else {
                continue;
            };
            let transaction: Transaction = decode_record(&key, &value)?;
            if transaction.bond_id == bond.id {
                transfers.push((sequence, transaction));
            }
        }
        transfers.sort_by_key(|(sequence, _)| *sequence);
        history.extend(transfers.into_iter().map(|(_, transaction)| transaction));

        Ok(history)
    }
}
