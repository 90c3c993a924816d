//! # Ledger Configuration
//!
//! Deployment-time settings: who may mint, what label minted bonds carry,
//! and which bonds `InitLedger` seeds.

use thiserror::Error;

use super::entities::Timestamp;
use super::identity::IssuerCertificate;

/// Seconds in one day, for seed bond durations.
pub const SECONDS_PER_DAY: Timestamp = 86_400;

/// Owner assigned to every minted bond.
pub const DEFAULT_ISSUER_LABEL: &str = "Government";

/// Upper bound on bonds created by a single mint.
pub const DEFAULT_MAX_MINT_COUNT: u64 = 10_000;

/// Lifetime of the default seed bonds.
const DEFAULT_SEED_DURATION_DAYS: i64 = 30;

/// Whether mint checks the caller against the issuer certificate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthorizationPolicy {
    /// Any caller may mint. Development and tests only.
    #[default]
    Disabled,
    /// Only a caller presenting exactly this certificate may mint.
    Enforced(IssuerCertificate),
}

impl AuthorizationPolicy {
    pub fn is_enforced(&self) -> bool {
        matches!(self, AuthorizationPolicy::Enforced(_))
    }
}

/// A bond written by `InitLedger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedBond {
    pub amount: i64,
    pub owner: String,
    pub duration_days: i64,
}

impl SeedBond {
    pub fn new(amount: i64, owner: impl Into<String>, duration_days: i64) -> Self {
        Self {
            amount,
            owner: owner.into(),
            duration_days,
        }
    }

    /// Reason this seed would violate a bond invariant, if any.
    pub(crate) fn defect(&self) -> Option<String> {
        if self.amount <= 0 {
            return Some(format!("amount must be positive, got {}", self.amount));
        }
        if self.owner.trim().is_empty() {
            return Some("owner must not be empty".to_string());
        }
        if self.duration_days <= 0 {
            return Some(format!(
                "duration must be at least one day, got {}",
                self.duration_days
            ));
        }
        None
    }
}

/// Configuration for the ledger service.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Mint authorization (default: disabled).
    pub authorization: AuthorizationPolicy,
    /// Owner of freshly minted bonds (default: "Government").
    pub issuer_label: String,
    /// Maximum `count` accepted by one mint (default: 10,000).
    pub max_mint_count: u64,
    /// Bonds written by `InitLedger`.
    pub seed_bonds: Vec<SeedBond>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            authorization: AuthorizationPolicy::Disabled,
            issuer_label: DEFAULT_ISSUER_LABEL.to_string(),
            max_mint_count: DEFAULT_MAX_MINT_COUNT,
            seed_bonds: default_seed_bonds(),
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require callers of mint to present `certificate`.
    pub fn with_issuer_certificate(mut self, certificate: IssuerCertificate) -> Self {
        self.authorization = AuthorizationPolicy::Enforced(certificate);
        self
    }

    pub fn with_authorization(mut self, policy: AuthorizationPolicy) -> Self {
        self.authorization = policy;
        self
    }

    pub fn with_issuer_label(mut self, label: impl Into<String>) -> Self {
        self.issuer_label = label.into();
        self
    }

    pub fn with_max_mint_count(mut self, max: u64) -> Self {
        self.max_mint_count = max;
        self
    }

    pub fn with_seed_bonds(mut self, seeds: Vec<SeedBond>) -> Self {
        self.seed_bonds = seeds;
        self
    }

    /// Check the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer_label.trim().is_empty() {
            return Err(ConfigError::EmptyIssuerLabel);
        }
        if self.max_mint_count == 0 {
            return Err(ConfigError::ZeroMintLimit);
        }
        for (index, seed) in self.seed_bonds.iter().enumerate() {
            if let Some(reason) = seed.defect() {
                return Err(ConfigError::InvalidSeedBond { index, reason });
            }
        }
        Ok(())
    }

    /// Stricter check for production deployments.
    ///
    /// Returns `Err` if mint authorization is disabled.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if !self.authorization.is_enforced() {
            return Err(ConfigError::AuthorizationDisabled);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "SECURITY VIOLATION: mint authorization is disabled. \
         Set BL_ISSUER_CERT to the issuer certificate PEM."
    )]
    AuthorizationDisabled,

    #[error("Issuer label must not be empty")]
    EmptyIssuerLabel,

    #[error("Maximum mint count must be positive")]
    ZeroMintLimit,

    #[error("Seed bond #{index} is invalid: {reason}")]
    InvalidSeedBond { index: usize, reason: String },
}

/// The six bonds a fresh ledger starts with.
fn default_seed_bonds() -> Vec<SeedBond> {
    [
        (100, "Tomoko"),
        (1000, "Brad"),
        (2000, "Jin Soo"),
        (3000, "Max"),
        (2000, "Adriana"),
        (1000, "Michel"),
    ]
    .into_iter()
    .map(|(amount, owner)| SeedBond::new(amount, owner, DEFAULT_SEED_DURATION_DAYS))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::generate_certificate_pem;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.issuer_label, "Government");
        assert_eq!(config.seed_bonds.len(), 6);
        assert_eq!(config.seed_bonds[2], SeedBond::new(2000, "Jin Soo", 30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_requires_authorization() {
        let config = LedgerConfig::default();
        assert_eq!(
            config.validate_for_production(),
            Err(ConfigError::AuthorizationDisabled)
        );

        let issuer = IssuerCertificate::from_pem(generate_certificate_pem("issuer")).unwrap();
        let config = LedgerConfig::new().with_issuer_certificate(issuer);
        assert!(config.validate_for_production().is_ok());
    }

    #[test]
    fn test_invalid_seed_rejected() {
        let config = LedgerConfig::new().with_seed_bonds(vec![
            SeedBond::new(100, "Tomoko", 30),
            SeedBond::new(100, "Brad", 0),
        ]);

        match config.validate() {
            Err(ConfigError::InvalidSeedBond { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected InvalidSeedBond, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_issuer_label_rejected() {
        let config = LedgerConfig::new().with_issuer_label("  ");
        assert_eq!(config.validate(), Err(ConfigError::EmptyIssuerLabel));
    }
}
