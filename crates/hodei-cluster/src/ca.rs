use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose, SerialNumber,
};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

#[derive(Debug, Error)]
pub enum CaError {
    #[error("invalid CSR: {0}")]
    InvalidCsr(String),

    #[error("invalid CA material: {0}")]
    InvalidCaMaterial(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Validates that `cert_pem` carries `BasicConstraints: CA=true` and returns
/// its SHA-256 fingerprint (hex) plus validity window. Used when an admin
/// uploads a new cluster CA.
pub fn validate_ca_certificate(cert_pem: &str) -> Result<(String, OffsetDateTime, OffsetDateTime), CaError> {
    let (_, pem) = x509_parser::pem::parse_x509_pem(cert_pem.as_bytes())
        .map_err(|err| CaError::InvalidCaMaterial(err.to_string()))?;
    let cert = pem
        .parse_x509()
        .map_err(|err| CaError::InvalidCaMaterial(err.to_string()))?;

    let is_ca = cert
        .basic_constraints()
        .ok()
        .flatten()
        .map(|bc| bc.value.ca)
        .unwrap_or(false);
    if !is_ca {
        return Err(CaError::InvalidCaMaterial(
            "certificate does not carry BasicConstraints: CA=true".to_string(),
        ));
    }

    let fingerprint = {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(cert.tbs_certificate.as_ref());
        hex::encode(digest)
    };

    let not_before = OffsetDateTime::from_unix_timestamp(cert.validity().not_before.timestamp())
        .map_err(|err| CaError::InvalidCaMaterial(err.to_string()))?;
    let not_after = OffsetDateTime::from_unix_timestamp(cert.validity().not_after.timestamp())
        .map_err(|err| CaError::InvalidCaMaterial(err.to_string()))?;

    Ok((fingerprint, not_before, not_after))
}

/// Signs a PEM-encoded CSR with the cluster's CA, producing a client/server
/// certificate valid for one year from now. Follows the spec's CSR-signing
/// procedure: decode, assign a fresh serial, stamp validity and key usage,
/// sign with the CA key.
pub fn sign_csr(csr_pem: &str, ca_cert_pem: &str, ca_key_pem: &str) -> Result<String, CaError> {
    let csr = rcgen::CertificateSigningRequestParams::from_pem(csr_pem)
        .map_err(|err| CaError::InvalidCsr(err.to_string()))?;

    let ca_key = KeyPair::from_pem(ca_key_pem).map_err(|err| CaError::InvalidCaMaterial(err.to_string()))?;
    let ca_params = ca_certificate_params(ca_cert_pem)?;
    let ca_cert = ca_params
        .self_signed(&ca_key)
        .map_err(|err| CaError::InvalidCaMaterial(err.to_string()))?;

    let mut params = CertificateParams::default();
    params.distinguished_name = csr.params.distinguished_name.clone();
    params.not_before = OffsetDateTime::now_utc();
    params.not_after = OffsetDateTime::now_utc() + Duration::days(365);
    params.is_ca = IsCa::NoCa;
    params.serial_number = Some(random_serial_number()?);
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature, KeyUsagePurpose::KeyEncipherment];
    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ClientAuth,
        ExtendedKeyUsagePurpose::ServerAuth,
    ];

    let leaf_key = csr.public_key();
    let signed = params
        .signed_by(leaf_key, &ca_cert, &ca_key)
        .map_err(|err| CaError::SigningFailed(err.to_string()))?;

    Ok(signed.pem())
}

/// A fresh 128-bit random serial, per the CSR-signing procedure's
/// "generate a 128-bit random serial" step.
fn random_serial_number() -> Result<SerialNumber, CaError> {
    let mut bytes = [0u8; 16];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| CaError::SigningFailed("failed to generate certificate serial".to_string()))?;
    Ok(SerialNumber::from_slice(&bytes))
}

fn ca_certificate_params(ca_cert_pem: &str) -> Result<CertificateParams, CaError> {
    let (_, pem) = x509_parser::pem::parse_x509_pem(ca_cert_pem.as_bytes())
        .map_err(|err| CaError::InvalidCaMaterial(err.to_string()))?;
    let cert = pem
        .parse_x509()
        .map_err(|err| CaError::InvalidCaMaterial(err.to_string()))?;

    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    for rdn in cert.subject().iter() {
        for attr in rdn.iter() {
            if let Ok(value) = attr.attr_value().as_str() {
                dn.push(rcgen::DnType::CommonName, value.to_string());
            }
        }
    }
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{CertificateParams, KeyPair};

    #[test]
    fn self_signed_ca_roundtrips_through_validation() {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::default();
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let cert = params.self_signed(&key).unwrap();

        let (_, not_before, not_after) = validate_ca_certificate(&cert.pem()).unwrap();
        assert!(not_before < not_after);
    }
}
