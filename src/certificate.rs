use std::time::{SystemTime, UNIX_EPOCH};

use rcgen::{CertificateParams, KeyPair, SignatureAlgorithm};

use crate::dtls_transport::dtls_fingerprint::{HashAlgorithm, RTCDtlsFingerprint};
use crate::error::{Error, Result};

/// KeyType selects the key a generated certificate is signed with.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyType {
    #[default]
    EcdsaP256,
    EcdsaP384,
    Ed25519,
}

impl KeyType {
    fn algorithm(&self) -> &'static SignatureAlgorithm {
        match *self {
            KeyType::EcdsaP256 => &rcgen::PKCS_ECDSA_P256_SHA256,
            KeyType::EcdsaP384 => &rcgen::PKCS_ECDSA_P384_SHA384,
            KeyType::Ed25519 => &rcgen::PKCS_ED25519,
        }
    }
}

/// Certificate represents a self signed X.509 certificate used to
/// authenticate the DTLS handshake of a transport.
///
/// ## Specifications
///
/// * [W3C]
///
/// [W3C]: https://w3c.github.io/webrtc-pc/#dom-rtccertificate
#[derive(Clone, Debug)]
pub struct RTCCertificate {
    /// DER encoded certificate.
    der: Vec<u8>,
    /// PKCS#8 DER encoded private key.
    private_key: Vec<u8>,
    signature_hash: HashAlgorithm,
    /// Timestamp after which this certificate is no longer valid.
    expires: SystemTime,
    /// Certificate's ID used for statistics.
    ///
    /// Example: "certificate-1667202302853538793"
    stats_id: String,
}

impl PartialEq for RTCCertificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl RTCCertificate {
    /// Generates a fresh key of `key_type` and a certificate for it.
    pub fn generate(key_type: KeyType) -> Result<Self> {
        let key_pair = KeyPair::generate_for(key_type.algorithm())?;
        RTCCertificate::from_key_pair(key_pair)
    }

    fn from_params(params: CertificateParams, key_pair: KeyPair) -> Result<Self> {
        let signature_hash = signature_hash(&key_pair)?;
        let expires: SystemTime = params.not_after.into();
        let cert = params.self_signed(&key_pair)?;

        Ok(RTCCertificate {
            der: cert.der().to_vec(),
            private_key: key_pair.serialize_der(),
            signature_hash,
            expires,
            stats_id: gen_stats_id(),
        })
    }

    /// Generates a new certificate with default [`CertificateParams`] using
    /// the given keypair. RSA keys are accepted here even though they can not
    /// be generated.
    pub fn from_key_pair(key_pair: KeyPair) -> Result<Self> {
        signature_hash(&key_pair)?;

        let params = CertificateParams::new(vec![format!("webrtc-jsep-{}", rand::random::<u32>())])?;
        RTCCertificate::from_params(params, key_pair)
    }

    /// Loads a PEM encoded PKCS#8 private key and issues a certificate for it.
    pub fn from_pem_key(pem: &str) -> Result<Self> {
        let key_pair = KeyPair::from_pem(pem)?;
        RTCCertificate::from_key_pair(key_pair)
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn private_key_der(&self) -> &[u8] {
        &self.private_key
    }

    pub fn expires(&self) -> SystemTime {
        self.expires
    }

    pub fn stats_id(&self) -> &str {
        &self.stats_id
    }

    /// The digest of the certificate signature, used for the fingerprint
    /// advertised in SDP.
    pub fn signature_hash_algorithm(&self) -> HashAlgorithm {
        self.signature_hash
    }

    pub fn fingerprint(&self, hash: HashAlgorithm) -> RTCDtlsFingerprint {
        RTCDtlsFingerprint::new(hash.name(), hash.digest(&self.der))
    }

    /// get_fingerprints returns the fingerprint computed with the digest
    /// algorithm used in the certificate signature.
    pub fn get_fingerprints(&self) -> Vec<RTCDtlsFingerprint> {
        vec![self.fingerprint(self.signature_hash)]
    }
}

fn signature_hash(key_pair: &KeyPair) -> Result<HashAlgorithm> {
    if key_pair.is_compatible(&rcgen::PKCS_ECDSA_P256_SHA256)
        || key_pair.is_compatible(&rcgen::PKCS_RSA_SHA256)
        || key_pair.is_compatible(&rcgen::PKCS_ED25519)
    {
        Ok(HashAlgorithm::Sha256)
    } else if key_pair.is_compatible(&rcgen::PKCS_ECDSA_P384_SHA384) {
        Ok(HashAlgorithm::Sha384)
    } else {
        Err(Error::ErrPrivateKeyType)
    }
}

fn gen_stats_id() -> String {
    format!(
        "certificate-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dtls_transport::dtls_fingerprint::verify_certificate_fingerprint;

    #[test]
    fn test_generate_certificate_rsa() -> Result<()> {
        let key_pair = KeyPair::generate_for(&rcgen::PKCS_RSA_SHA256);
        assert!(key_pair.is_err(), "RcgenError::KeyGenerationUnavailable");

        Ok(())
    }

    #[test]
    fn test_generate_certificate_key_types() -> Result<()> {
        let tests = vec![
            (KeyType::EcdsaP256, HashAlgorithm::Sha256),
            (KeyType::EcdsaP384, HashAlgorithm::Sha384),
            (KeyType::Ed25519, HashAlgorithm::Sha256),
        ];

        for (key_type, hash) in tests {
            let cert = RTCCertificate::generate(key_type)?;
            assert!(!cert.der().is_empty());
            assert!(!cert.private_key_der().is_empty());
            assert_eq!(cert.signature_hash_algorithm(), hash, "{key_type:?}");
        }

        Ok(())
    }

    #[test]
    fn test_certificate_from_pem_key() -> Result<()> {
        let key_pair = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256)?;
        let cert = RTCCertificate::from_pem_key(&key_pair.serialize_pem())?;
        assert_eq!(cert.private_key_der(), key_pair.serialize_der().as_slice());

        assert!(RTCCertificate::from_pem_key("not a key").is_err());

        Ok(())
    }

    #[test]
    fn test_certificate_equal() -> Result<()> {
        let cert1 = RTCCertificate::generate(KeyType::EcdsaP256)?;
        let cert2 = RTCCertificate::generate(KeyType::EcdsaP256)?;

        assert_ne!(cert1, cert2);
        assert_eq!(cert1, cert1.clone());

        Ok(())
    }

    #[test]
    fn test_generate_certificate_expires_and_stats_id() -> Result<()> {
        let cert = RTCCertificate::generate(KeyType::default())?;

        let now = SystemTime::now();
        assert!(cert.expires().duration_since(now).is_ok());
        assert!(cert.stats_id().contains("certificate"));

        Ok(())
    }

    #[test]
    fn test_certificate_fingerprints() -> Result<()> {
        let cert = RTCCertificate::generate(KeyType::EcdsaP256)?;

        let fingerprints = cert.get_fingerprints();
        assert_eq!(fingerprints.len(), 1);
        assert_eq!(fingerprints[0].algorithm, "sha-256");

        for hash in HashAlgorithm::ALL {
            let fp = cert.fingerprint(hash);
            verify_certificate_fingerprint(Some(cert.der()), Some(&fp))?;
        }

        let other = RTCCertificate::generate(KeyType::EcdsaP256)?;
        assert!(verify_certificate_fingerprint(Some(other.der()), Some(&fingerprints[0])).is_err());

        Ok(())
    }
}
