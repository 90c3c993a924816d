//! Runtime configuration loaded from the environment.
//!
//! | Variable         | Meaning                                        |
//! |------------------|------------------------------------------------|
//! | `BL_DATA_FILE`   | Ledger file (default `./data/ledger.db`)       |
//! | `BL_ISSUER_CERT` | PEM file of the issuer; enforces mint checks   |
//! | `BL_CALLER_CERT` | PEM file presented as the invoking identity    |
//! | `BL_PRODUCTION`  | `1`/`true` requires an issuer certificate      |

use std::path::PathBuf;

use anyhow::{Context, Result};
use bond_ledger::{InvocationContext, IssuerCertificate, LedgerConfig};
use tracing::{info, warn};

pub const DEFAULT_DATA_FILE: &str = "./data/ledger.db";

/// Everything the runtime needs to open the ledger and invoke it.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub data_file: PathBuf,
    pub ledger: LedgerConfig,
    pub caller_certificate: Option<PathBuf>,
    pub production: bool,
}

impl RuntimeConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_file = lookup("BL_DATA_FILE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let mut ledger = LedgerConfig::default();
        if let Some(path) = lookup("BL_ISSUER_CERT").filter(|v| !v.is_empty()) {
            let pem = std::fs::read_to_string(&path)
                .with_context(|| format!("reading issuer certificate {}", path))?;
            let issuer = IssuerCertificate::from_pem(pem)
                .with_context(|| format!("parsing issuer certificate {}", path))?;
            ledger = ledger.with_issuer_certificate(issuer);
            info!("Mint authorization enforced with issuer certificate {}", path);
        } else {
            warn!("BL_ISSUER_CERT not set, any caller may mint");
        }

        let caller_certificate = lookup("BL_CALLER_CERT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let production = match lookup("BL_PRODUCTION").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => anyhow::bail!("BL_PRODUCTION must be 0/1/true/false, got {:?}", other),
        };

        Ok(Self {
            data_file,
            ledger,
            caller_certificate,
            production,
        })
    }

    /// Check the ledger configuration, with the stricter production rules
    /// when `BL_PRODUCTION` is set.
    pub fn validate(&self) -> Result<()> {
        if self.production {
            self.ledger.validate_for_production()?;
        } else {
            self.ledger.validate()?;
        }
        Ok(())
    }

    /// Identity presented by this invocation.
    pub fn invocation_context(&self) -> Result<InvocationContext> {
        match &self.caller_certificate {
            Some(path) => {
                let creator = std::fs::read(path)
                    .with_context(|| format!("reading caller certificate {}", path.display()))?;
                Ok(InvocationContext::new(creator))
            }
            None => Ok(InvocationContext::anonymous()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_ledger::test_utils::generate_certificate_pem;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert!(!config.ledger.authorization.is_enforced());
        assert!(config.caller_certificate.is_none());
        assert!(!config.production);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.invocation_context().unwrap(),
            InvocationContext::anonymous()
        );
    }

    #[test]
    fn test_production_requires_issuer() {
        let config =
            RuntimeConfig::from_lookup(lookup_from(&[("BL_PRODUCTION", "1".to_string())])).unwrap();

        assert!(config.production);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_issuer_and_caller_certificates_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let issuer_path = dir.path().join("issuer.pem");
        let pem = generate_certificate_pem("issuer.example");
        std::fs::write(&issuer_path, &pem).unwrap();

        let issuer = issuer_path.display().to_string();
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            ("BL_ISSUER_CERT", issuer.clone()),
            ("BL_CALLER_CERT", issuer),
            ("BL_PRODUCTION", "true".to_string()),
        ]))
        .unwrap();

        assert!(config.ledger.authorization.is_enforced());
        assert!(config.validate().is_ok());
        assert_eq!(
            config.invocation_context().unwrap().creator(),
            pem.as_bytes()
        );
    }

    #[test]
    fn test_invalid_issuer_certificate_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issuer.pem");
        std::fs::write(&path, "not a certificate").unwrap();

        let result = RuntimeConfig::from_lookup(lookup_from(&[(
            "BL_ISSUER_CERT",
            path.display().to_string(),
        )]));
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_production_flag() {
        let result =
            RuntimeConfig::from_lookup(lookup_from(&[("BL_PRODUCTION", "yes".to_string())]));
        assert!(result.is_err());
    }
}
