//! # State Store Keys
//!
//! Every record lives under a plain string key:
//!
//! | Key | Value |
//! |-----|-------|
//! | `B_num` | JSON integer, bond sequence |
//! | `T_num` | JSON integer, transaction sequence |
//! | `b_<n>` | Bond |
//! | `transaction<n>` | Mint transaction (`n` = bond sequence of the minted bond) |
//! | `t_<n>` | Transfer transaction (`n` = transaction sequence after the transfer) |
//!
//! Identifiers are parsed strictly: a canonical decimal suffix and the right
//! family prefix. Anything else is treated as an id that does not exist.

use serde::{Serialize, Serializer};
use std::fmt;

/// The two monotonic counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// Bonds minted so far: `B_num`.
    BondSequence,
    /// Transactions recorded so far: `T_num`.
    TransactionSequence,
}

impl Counter {
    /// Store key of this counter.
    pub const fn key(&self) -> &'static str {
        match self {
            Counter::BondSequence => "B_num",
            Counter::TransactionSequence => "T_num",
        }
    }
}

/// Key prefixes of the record families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Bond: `b_{n}`
    Bond,
    /// Mint transaction: `transaction{n}`
    MintTransaction,
    /// Transfer transaction: `t_{n}`
    TransferTransaction,
}

impl KeyPrefix {
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyPrefix::Bond => "b_",
            KeyPrefix::MintTransaction => "transaction",
            KeyPrefix::TransferTransaction => "t_",
        }
    }

    /// Build a full key for sequence number `n`.
    pub fn key(&self, n: u64) -> String {
        format!("{}{}", self.as_str(), n)
    }

    /// Extract the sequence number from `raw` if it belongs to this family.
    fn parse_sequence(&self, raw: &str) -> Option<u64> {
        let digits = raw.strip_prefix(self.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Leading zeros would name a different key than the one we write.
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        digits.parse().ok()
    }
}

/// Identifier of a bond: `b_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BondId(u64);

impl BondId {
    pub const fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        KeyPrefix::Bond.parse_sequence(raw).map(Self)
    }

    pub const fn sequence(&self) -> u64 {
        self.0
    }

    /// Mint transaction that created this bond.
    pub const fn mint_transaction(&self) -> TransactionId {
        TransactionId::Mint(self.0)
    }
}

impl fmt::Display for BondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", KeyPrefix::Bond.as_str(), self.0)
    }
}

impl Serialize for BondId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identifier of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionId {
    /// `transaction<n>`, paired with bond `b_<n>`.
    Mint(u64),
    /// `t_<n>`, the n-th recorded transaction.
    Transfer(u64),
}

impl TransactionId {
    pub fn parse(raw: &str) -> Option<Self> {
        // `transaction` is checked first; `t_` can never match it anyway.
        KeyPrefix::MintTransaction
            .parse_sequence(raw)
            .map(TransactionId::Mint)
            .or_else(|| {
                KeyPrefix::TransferTransaction
                    .parse_sequence(raw)
                    .map(TransactionId::Transfer)
            })
    }

    pub const fn sequence(&self) -> u64 {
        match self {
            TransactionId::Mint(n) | TransactionId::Transfer(n) => *n,
        }
    }

    pub const fn is_mint(&self) -> bool {
        matches!(self, TransactionId::Mint(_))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionId::Mint(n) => write!(f, "{}{}", KeyPrefix::MintTransaction.as_str(), n),
            TransactionId::Transfer(n) => {
                write!(f, "{}{}", KeyPrefix::TransferTransaction.as_str(), n)
            }
        }
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
