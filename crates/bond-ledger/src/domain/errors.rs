//! # Domain Errors
//!
//! Error types for the Bond Ledger.
//!
//! Each `LedgerError` variant is a distinct failure the caller can match on.
//! Nothing is retried or swallowed inside the ledger; a failure before commit
//! discards every staged write of the operation.

use std::fmt;
use thiserror::Error;

use super::entities::Timestamp;

/// Which record family a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Bond,
    Transaction,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Bond => write!(f, "Bond"),
            RecordKind::Transaction => write!(f, "Transaction"),
        }
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No record exists under this id.
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// Transfer attempted after the bond's expiry (INVARIANT-5).
    #[error("Bond {bond_id} expired at {expiry_time} (now {now}), cannot transfer (INVARIANT-5)")]
    Expired {
        bond_id: String,
        expiry_time: Timestamp,
        now: Timestamp,
    },

    /// Caller is not the configured issuer (INVARIANT-6).
    #[error("Unauthorized: {reason} (INVARIANT-6)")]
    Unauthorized { reason: String },

    /// A PEM block or X.509 certificate could not be decoded.
    #[error("Malformed certificate: {reason}")]
    MalformedCertificate { reason: String },

    /// Counter key absent, the ledger has not been initialized.
    #[error("Counter {key} missing, ledger not initialized")]
    CounterMissing { key: &'static str },

    /// The state store rejected a write.
    #[error("Store write failure: {message}")]
    StoreWriteFailure { message: String },

    /// The state store failed a read.
    #[error("Store read failure: {message}")]
    StoreReadFailure { message: String },

    /// Request argument out of range.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Stored bytes are not a valid record.
    #[error("Corrupt record at {key}: {message}")]
    CorruptRecord { key: String, message: String },
}

impl LedgerError {
    pub fn bond_not_found(id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            kind: RecordKind::Bond,
            id: id.into(),
        }
    }

    pub fn transaction_not_found(id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            kind: RecordKind::Transaction,
            id: id.into(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        LedgerError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn malformed_certificate(reason: impl Into<String>) -> Self {
        LedgerError::MalformedCertificate {
            reason: reason.into(),
        }
    }

    pub(crate) fn store_read(err: KVStoreError) -> Self {
        LedgerError::StoreReadFailure {
            message: err.to_string(),
        }
    }

    pub(crate) fn store_write(err: KVStoreError) -> Self {
        LedgerError::StoreWriteFailure {
            message: err.to_string(),
        }
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },
    /// The store refused the write (conflict, read-only, quota).
    #[error("KV store rejected write: {message}")]
    Rejected { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Expired {
            bond_id: "b_1".to_string(),
            expiry_time: 10,
            now: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("INVARIANT-5"));
        assert!(msg.contains("b_1"));

        let err = LedgerError::bond_not_found("b_99");
        assert_eq!(err.to_string(), "Bond not found: b_99");
    }

    #[test]
    fn test_kv_error_conversion() {
        let kv_err = KVStoreError::IOError {
            message: "disk failure".to_string(),
        };

        match LedgerError::store_write(kv_err.clone()) {
            LedgerError::StoreWriteFailure { message } => {
                assert!(message.contains("disk failure"));
            }
            other => panic!("Expected StoreWriteFailure, got {other:?}"),
        }
        assert!(matches!(
            LedgerError::store_read(kv_err),
            LedgerError::StoreReadFailure { .. }
        ));
    }
}
