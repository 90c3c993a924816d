//! # Service Helpers
//!
//! Record decoding and the mint authorization gate.

use serde::de::DeserializeOwned;

use super::BondLedgerService;
use crate::domain::config::AuthorizationPolicy;
use crate::domain::errors::LedgerError;
use crate::domain::identity::{verify, InvocationContext};
use crate::ports::outbound::{KeyValueStore, TimeSource};

/// Decode a stored JSON record, naming the key on failure.
pub(crate) fn decode_record<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, LedgerError> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::CorruptRecord {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Read and decode the committed record under `key`.
pub(crate) fn read_record<KV, T>(store: &KV, key: &str) -> Result<Option<T>, LedgerError>
where
    KV: KeyValueStore,
    T: DeserializeOwned,
{
    store
        .get(key.as_bytes())
        .map_err(LedgerError::store_read)?
        .map(|bytes| decode_record(key, &bytes))
        .transpose()
}

impl<KV, TS> BondLedgerService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Check the caller may mint (INVARIANT-6).
    ///
    /// Runs before any ledger state is read or staged.
    pub(crate) fn authorize_mint(&self, ctx: &InvocationContext) -> Result<(), LedgerError> {
        match &self.config.authorization {
            AuthorizationPolicy::Disabled => {
                tracing::debug!("[bond-ledger] Mint authorization disabled, caller not checked");
                Ok(())
            }
            AuthorizationPolicy::Enforced(issuer) => {
                if verify(ctx, issuer.as_pem().as_bytes())? {
                    Ok(())
                } else {
                    tracing::warn!("[bond-ledger] ⛔ Mint refused: caller is not the issuer");
                    Err(LedgerError::Unauthorized {
                        reason: "caller certificate does not match the issuer certificate"
                            .to_string(),
                    })
                }
            }
        }
    }
}
