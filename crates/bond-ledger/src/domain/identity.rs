//! # Issuer Identity
//!
//! Decides whether the invoking caller is the authorized issuer.
//!
//! The caller presents a PEM-encoded X.509 certificate in the creator
//! metadata of its invocation context. Both that certificate and the
//! configured issuer certificate are PEM-decoded and parsed as X.509, then
//! compared on their complete DER encoding: subject, issuer, key, validity,
//! extensions and signature must all match.

use x509_parser::parse_x509_certificate;

use super::errors::LedgerError;

/// PEM tag a certificate block must carry.
const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Caller metadata supplied by the surrounding runtime for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    /// PEM-encoded certificate of the invoking identity.
    creator: Vec<u8>,
}

impl InvocationContext {
    pub fn new(creator: impl Into<Vec<u8>>) -> Self {
        Self {
            creator: creator.into(),
        }
    }

    /// Context without any caller certificate.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn creator(&self) -> &[u8] {
        &self.creator
    }
}

/// The certificate authorized to mint, as configured at deployment.
///
/// Parsed once on construction so a bad deployment fails at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerCertificate {
    pem: String,
}

impl IssuerCertificate {
    pub fn from_pem(pem: impl Into<String>) -> Result<Self, LedgerError> {
        let pem = pem.into();
        certificate_der(pem.as_bytes(), "issuer")?;
        Ok(Self { pem })
    }

    pub fn as_pem(&self) -> &str {
        &self.pem
    }
}

/// Compare the caller's certificate with `authorized_pem`.
///
/// Returns `Ok(false)` for two well-formed but different certificates and
/// `MalformedCertificate` if either side fails PEM or X.509 decoding.
pub fn verify(ctx: &InvocationContext, authorized_pem: &[u8]) -> Result<bool, LedgerError> {
    let caller = certificate_der(ctx.creator(), "creator")?;
    let authorized = certificate_der(authorized_pem, "issuer")?;
    Ok(caller == authorized)
}

/// Decode a PEM certificate block and return its DER bytes once they parse
/// as exactly one X.509 certificate.
fn certificate_der(pem_bytes: &[u8], role: &str) -> Result<Vec<u8>, LedgerError> {
    if pem_bytes.is_empty() {
        return Err(LedgerError::malformed_certificate(format!(
            "no {role} certificate present"
        )));
    }

    let block = pem::parse(pem_bytes).map_err(|e| {
        LedgerError::malformed_certificate(format!(
            "failed to decode PEM block containing {role} certificate: {e}"
        ))
    })?;

    if block.tag() != CERTIFICATE_TAG {
        return Err(LedgerError::malformed_certificate(format!(
            "{role} PEM block is tagged {}, expected {CERTIFICATE_TAG}",
            block.tag()
        )));
    }

    let der = block.contents();
    let (rest, _) = parse_x509_certificate(der).map_err(|e| {
        LedgerError::malformed_certificate(format!("failed to parse {role} certificate: {e:?}"))
    })?;
    if !rest.is_empty() {
        return Err(LedgerError::malformed_certificate(format!(
            "{role} certificate has {} trailing bytes",
            rest.len()
        )));
    }

    Ok(der.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::generate_certificate_pem;

    #[test]
    fn test_same_certificate_verifies() {
        let cert = generate_certificate_pem("issuer.example");
        let ctx = InvocationContext::new(cert.clone());

        assert!(verify(&ctx, cert.as_bytes()).unwrap());
    }

    #[test]
    fn test_same_der_in_different_pem_encoding_verifies() {
        let cert = generate_certificate_pem("issuer.example");
        let crlf = cert.replace('\n', "\r\n");
        assert_ne!(cert, crlf);

        let ctx = InvocationContext::new(crlf);
        assert!(verify(&ctx, cert.as_bytes()).unwrap());
    }

    #[test]
    fn test_different_certificates_do_not_verify() {
        let issuer = generate_certificate_pem("issuer.example");
        // Same subject, fresh key pair: only a full DER comparison catches it.
        let impostor = generate_certificate_pem("issuer.example");

        let ctx = InvocationContext::new(impostor);
        assert!(!verify(&ctx, issuer.as_bytes()).unwrap());
    }

    #[test]
    fn test_unparsable_caller_pem_is_malformed() {
        let issuer = generate_certificate_pem("issuer.example");
        let ctx = InvocationContext::new(b"not a certificate".to_vec());

        let result = verify(&ctx, issuer.as_bytes());
        assert!(matches!(result, Err(LedgerError::MalformedCertificate { .. })));
    }

    #[test]
    fn test_unparsable_issuer_pem_is_malformed() {
        let caller = generate_certificate_pem("caller.example");
        let ctx = InvocationContext::new(caller);

        let result = verify(&ctx, b"-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----\n");
        assert!(matches!(result, Err(LedgerError::MalformedCertificate { .. })));
    }

    #[test]
    fn test_valid_pem_with_garbage_der_is_malformed() {
        let garbage = pem::encode(&pem::Pem::new(CERTIFICATE_TAG, vec![0x30, 0x03, 0x01, 0x02]));
        let issuer = generate_certificate_pem("issuer.example");
        let ctx = InvocationContext::new(garbage);

        let result = verify(&ctx, issuer.as_bytes());
        assert!(matches!(result, Err(LedgerError::MalformedCertificate { .. })));
    }

    #[test]
    fn test_wrong_pem_tag_is_malformed() {
        let key_block = pem::encode(&pem::Pem::new("PRIVATE KEY", vec![1, 2, 3]));
        let result = IssuerCertificate::from_pem(key_block);
        assert!(matches!(result, Err(LedgerError::MalformedCertificate { .. })));
    }

    #[test]
    fn test_anonymous_context_is_malformed() {
        let issuer = generate_certificate_pem("issuer.example");
        let result = verify(&InvocationContext::anonymous(), issuer.as_bytes());
        assert!(matches!(result, Err(LedgerError::MalformedCertificate { .. })));
    }
}
