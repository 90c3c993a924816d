//! # Asset Ledger
//!
//! Creation, lookup and transfer of bonds. Each mutating operation builds one
//! `StagedWrites` and commits it once.

use super::counters::{read_counter, write_counter, Counters};
use super::helpers::read_record;
use super::staged::StagedWrites;
use super::BondLedgerService;
use crate::domain::config::SECONDS_PER_DAY;
use crate::domain::entities::{Bond, LedgerStatus, Transaction};
use crate::domain::errors::LedgerError;
use crate::domain::keys::{BondId, Counter, TransactionId};
use crate::ports::inbound::MintRequest;
use crate::ports::outbound::{KeyValueStore, TimeSource};

impl<KV, TS> BondLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Seed the configured bonds as `b_1..b_n`, `B_num = n`, `T_num = 0`.
    pub(crate) fn initialize_ledger(&mut self) -> Result<LedgerStatus, LedgerError> {
        let now = self.time_source.now();

        let mut bonds = Vec::with_capacity(self.config.seed_bonds.len());
        for (index, seed) in self.config.seed_bonds.iter().enumerate() {
            if let Some(reason) = seed.defect() {
                return Err(LedgerError::invalid_argument(format!(
                    "seed bond #{index}: {reason}"
                )));
            }
            let expiry = seed
                .duration_days
                .checked_mul(SECONDS_PER_DAY)
                .and_then(|duration| now.checked_add(duration))
                .ok_or_else(|| {
                    LedgerError::invalid_argument(format!(
                        "seed bond #{index}: duration of {} days overflows",
                        seed.duration_days
                    ))
                })?;
            let id = BondId::new(index as u64 + 1);
            bonds.push(Bond::new(&id, seed.amount, seed.owner.clone(), now, expiry));
        }

        let mut writes = StagedWrites::new(&mut self.kv_store);
        if writes.get(Counter::BondSequence.key())?.is_some() {
            tracing::warn!(
                "[bond-ledger] ⚠️ Ledger already initialized, seed bonds and counters will be overwritten"
            );
        }

        for bond in &bonds {
            writes.put_json(bond.id.clone(), bond)?;
        }
        let counters = Counters {
            bond_sequence: bonds.len() as u64,
            transaction_sequence: 0,
        };
        counters.stage(&mut writes)?;
        writes.commit()?;

        tracing::info!(
            "[bond-ledger] 🌱 Ledger initialized with {} seed bonds",
            bonds.len()
        );
        Ok(counters.into())
    }

    /// Create `request.count` bonds and their mint transactions.
    ///
    /// Authorization has already been checked by the caller.
    pub(crate) fn mint_bonds(&mut self, request: &MintRequest) -> Result<Vec<BondId>, LedgerError> {
        if request.count <= 0 {
            return Err(LedgerError::invalid_argument(format!(
                "count must be positive, got {}",
                request.count
            )));
        }
        if request.amount <= 0 {
            return Err(LedgerError::invalid_argument(format!(
                "amount must be positive, got {}",
                request.amount
            )));
        }
        let count = request.count as u64;
        if count > self.config.max_mint_count {
            return Err(LedgerError::invalid_argument(format!(
                "count {count} exceeds the per-mint limit of {}",
                self.config.max_mint_count
            )));
        }

        let now = self.time_source.now();
        if request.expiry <= now {
            return Err(LedgerError::invalid_argument(format!(
                "expiry {} must be later than issue time {now}",
                request.expiry
            )));
        }

        let issuer = self.config.issuer_label.as_str();
        let mut writes = StagedWrites::new(&mut self.kv_store);
        let before = Counters::load(&writes)?;
        let after = before.advance(count)?;

        let mut minted = Vec::with_capacity(count as usize);
        for sequence in (before.bond_sequence + 1)..=after.bond_sequence {
            let bond_id = BondId::new(sequence);
            let bond = Bond::new(&bond_id, request.amount, issuer, now, request.expiry);
            let transaction = Transaction::mint(&bond_id.mint_transaction(), &bond_id, now);

            writes.put_json(bond.id.clone(), &bond)?;
            writes.put_json(transaction.id.clone(), &transaction)?;
            minted.push(bond_id);
        }
        after.stage(&mut writes)?;
        writes.commit()?;

        tracing::info!(
            "[bond-ledger] 🪙 Minted {} bonds ({}..={}), amount {}, B_num={}, T_num={}",
            count,
            BondId::new(before.bond_sequence + 1),
            BondId::new(after.bond_sequence),
            request.amount,
            after.bond_sequence,
            after.transaction_sequence
        );
        Ok(minted)
    }

    /// Move bond `id` to `new_owner` and record a transfer transaction.
    pub(crate) fn transfer_bond(
        &mut self,
        id: &str,
        new_owner: &str,
    ) -> Result<TransactionId, LedgerError> {
        if new_owner.trim().is_empty() {
            return Err(LedgerError::invalid_argument("new owner must not be empty"));
        }
        let bond_id = BondId::parse(id).ok_or_else(|| LedgerError::bond_not_found(id))?;
        let now = self.time_source.now();

        let mut writes = StagedWrites::new(&mut self.kv_store);
        let mut bond: Bond = writes
            .get_json(&bond_id.to_string())?
            .ok_or_else(|| LedgerError::bond_not_found(id))?;

        // INVARIANT-5: no transfer past expiry
        if bond.is_expired_at(now) {
            tracing::warn!(
                "[bond-ledger] ⛔ Transfer of {} refused: expired at {}",
                bond_id,
                bond.expiry_time
            );
            return Err(LedgerError::Expired {
                bond_id: bond_id.to_string(),
                expiry_time: bond.expiry_time,
                now,
            });
        }

        let sequence = read_counter(&writes, Counter::TransactionSequence)?
            .checked_add(1)
            .ok_or_else(|| LedgerError::invalid_argument("transaction sequence overflow"))?;
        let tx_id = TransactionId::Transfer(sequence);

        let seller = bond.transfer_to(new_owner);
        let transaction = Transaction::transfer(&tx_id, &bond_id, seller, new_owner, now);

        writes.put_json(bond_id.to_string(), &bond)?;
        writes.put_json(tx_id.to_string(), &transaction)?;
        write_counter(&mut writes, Counter::TransactionSequence, sequence)?;
        writes.commit()?;

        tracing::info!(
            "[bond-ledger] 🔁 {} transferred {} → {} as {}",
            bond_id,
            transaction.seller,
            transaction.buyer,
            tx_id
        );
        Ok(tx_id)
    }

    /// Committed bond under `id`.
    pub(crate) fn load_bond(&self, id: &str) -> Result<Bond, LedgerError> {
        let bond_id = BondId::parse(id).ok_or_else(|| LedgerError::bond_not_found(id))?;
        tracing::debug!("[bond-ledger] Reading {}", bond_id);
        read_record(&self.kv_store, &bond_id.to_string())?
            .ok_or_else(|| LedgerError::bond_not_found(id))
    }

    /// Committed values of both counters.
    pub(crate) fn load_status(&self) -> Result<LedgerStatus, LedgerError> {
        let read = |counter: Counter| -> Result<u64, LedgerError> {
            read_record(&self.kv_store, counter.key())?
                .ok_or(LedgerError::CounterMissing { key: counter.key() })
        };
        Ok(LedgerStatus {
            bond_sequence: read(Counter::BondSequence)?,
            transaction_sequence: read(Counter::TransactionSequence)?,
        })
    }
}
