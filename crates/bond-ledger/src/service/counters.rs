//! # Counter Manager
//!
//! `B_num` and `T_num` are ordinary store records. They are read once at the
//! start of an operation and written once at the end, inside the same
//! `StagedWrites` as the records they number. There is no compare-and-swap:
//! concurrent invocations are serialized by the surrounding store.

use super::staged::StagedWrites;
use crate::domain::entities::LedgerStatus;
use crate::domain::errors::LedgerError;
use crate::domain::keys::Counter;
use crate::ports::outbound::KeyValueStore;

/// Current value of `counter`; `CounterMissing` if never initialized.
pub fn read_counter<KV: KeyValueStore>(
    writes: &StagedWrites<'_, KV>,
    counter: Counter,
) -> Result<u64, LedgerError> {
    writes
        .get_json::<u64>(counter.key())?
        .ok_or(LedgerError::CounterMissing { key: counter.key() })
}

/// Stage `value` as the new value of `counter`.
pub fn write_counter<KV: KeyValueStore>(
    writes: &mut StagedWrites<'_, KV>,
    counter: Counter,
    value: u64,
) -> Result<(), LedgerError> {
    writes.put_json(counter.key(), &value)
}

/// Both counters, loaded and staged together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub bond_sequence: u64,
    pub transaction_sequence: u64,
}

impl Counters {
    pub fn load<KV: KeyValueStore>(writes: &StagedWrites<'_, KV>) -> Result<Self, LedgerError> {
        Ok(Self {
            bond_sequence: read_counter(writes, Counter::BondSequence)?,
            transaction_sequence: read_counter(writes, Counter::TransactionSequence)?,
        })
    }

    pub fn stage<KV: KeyValueStore>(
        &self,
        writes: &mut StagedWrites<'_, KV>,
    ) -> Result<(), LedgerError> {
        write_counter(writes, Counter::BondSequence, self.bond_sequence)?;
        write_counter(writes, Counter::TransactionSequence, self.transaction_sequence)
    }

    /// Advance both counters by `count`, or fail if either would overflow.
    pub fn advance(&self, count: u64) -> Result<Self, LedgerError> {
        let overflow = || {
            LedgerError::invalid_argument(format!("minting {count} bonds overflows the sequence"))
        };
        Ok(Self {
            bond_sequence: self.bond_sequence.checked_add(count).ok_or_else(overflow)?,
            transaction_sequence: self
                .transaction_sequence
                .checked_add(count)
                .ok_or_else(overflow)?,
        })
    }
}

impl From<Counters> for LedgerStatus {
    fn from(counters: Counters) -> Self {
        LedgerStatus {
            bond_sequence: counters.bond_sequence,
            transaction_sequence: counters.transaction_sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryKVStore;

    #[test]
    fn test_missing_counter() {
        let mut store = InMemoryKVStore::new();
        let writes = StagedWrites::new(&mut store);

        assert_eq!(
            read_counter(&writes, Counter::BondSequence),
            Err(LedgerError::CounterMissing { key: "B_num" })
        );
    }

    #[test]
    fn test_counter_stored_as_json_integer() {
        let mut store = InMemoryKVStore::new();
        let mut writes = StagedWrites::new(&mut store);
        write_counter(&mut writes, Counter::TransactionSequence, 12).unwrap();
        writes.commit().unwrap();

        assert_eq!(store.get(b"T_num").unwrap(), Some(b"12".to_vec()));
    }

    #[test]
    fn test_advance_overflow() {
        let counters = Counters {
            bond_sequence: u64::MAX - 1,
            transaction_sequence: 0,
        };
        assert!(counters.advance(1).is_ok());
        assert!(matches!(
            counters.advance(2),
            Err(LedgerError::InvalidArgument { .. })
        ));
    }
}
