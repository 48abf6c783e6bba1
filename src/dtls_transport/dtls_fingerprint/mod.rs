
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::error::{Error, Result};

/// HashAlgorithm is one of the 'Hash function Textual Names' usable in an
/// `a=fingerprint:` attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    pub fn name(&self) -> &'static str {
        match *self {
            HashAlgorithm::Sha1 => "sha-1",
            HashAlgorithm::Sha224 => "sha-224",
            HashAlgorithm::Sha256 => "sha-256",
            HashAlgorithm::Sha384 => "sha-384",
            HashAlgorithm::Sha512 => "sha-512",
        }
    }

    /// Names are matched case-insensitively, as SDP producers disagree on
    /// the case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match *self {
            HashAlgorithm::Sha1 => sha1::Sha1::digest(data).to_vec(),
            HashAlgorithm::Sha224 => sha2::Sha224::digest(data).to_vec(),
            HashAlgorithm::Sha256 => sha2::Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha384 => sha2::Sha384::digest(data).to_vec(),
            HashAlgorithm::Sha512 => sha2::Sha512::digest(data).to_vec(),
        }
    }

    pub fn digest_len(&self) -> usize {
        match *self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// RTCDtlsFingerprint specifies the hash function algorithm and certificate
/// fingerprint as described in [RFC 4572].
///
/// The digest is kept as raw bytes; [`RTCDtlsFingerprint::value`] gives the
/// uppercase colon separated wire form.
///
/// ## Specifications
///
/// * [W3C]
///
/// [W3C]: https://w3c.github.io/webrtc-pc/#rtcdtlsfingerprint
/// [RFC 4572]: https://tools.ietf.org/html/rfc4572
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCDtlsFingerprint {
    /// Algorithm specifies one of the the hash function algorithms defined in
    /// the 'Hash function Textual Names' registry.
    pub algorithm: String,

    pub digest: Vec<u8>,
}

impl RTCDtlsFingerprint {
    pub fn new(algorithm: &str, digest: Vec<u8>) -> Self {
        RTCDtlsFingerprint {
            algorithm: algorithm.to_owned(),
            digest,
        }
    }

    /// from_certificate_der hashes a DER encoded certificate.
    pub fn from_certificate_der(algorithm: &str, der: &[u8]) -> Result<Self> {
        let hash = HashAlgorithm::from_name(algorithm)
            .ok_or_else(|| Error::ErrUnsupportedHashAlgorithm(algorithm.to_owned()))?;
        Ok(RTCDtlsFingerprint::new(hash.name(), hash.digest(der)))
    }

    /// parse builds a fingerprint from the algorithm name and the
    /// colon separated hex value of an `a=fingerprint:` line.
    pub fn parse(algorithm: &str, value: &str) -> Result<Self> {
        let hash = HashAlgorithm::from_name(algorithm)
            .ok_or_else(|| Error::ErrUnsupportedHashAlgorithm(algorithm.to_owned()))?;

        let mut digest = Vec::with_capacity(hash.digest_len());
        for octet in value.split(':') {
            if octet.len() != 2 {
                return Err(Error::ErrInvalidFingerprint(value.to_owned()));
            }
            let byte = hex::decode(octet)
                .map_err(|_| Error::ErrInvalidFingerprint(value.to_owned()))?;
            digest.extend_from_slice(&byte);
        }
        if digest.len() != hash.digest_len() {
            return Err(Error::ErrInvalidFingerprint(value.to_owned()));
        }

        Ok(RTCDtlsFingerprint::new(hash.name(), digest))
    }

    pub fn hash_algorithm(&self) -> Option<HashAlgorithm> {
        HashAlgorithm::from_name(&self.algorithm)
    }

    /// value formats the digest as uppercase hex octets joined by colons.
    pub fn value(&self) -> String {
        self.digest
            .iter()
            .map(|b| hex::encode_upper([*b]))
            .collect::<Vec<String>>()
            .join(":")
    }

    /// verify checks that `der` hashes to this fingerprint.
    pub fn verify(&self, der: &[u8]) -> Result<()> {
        let hash = self
            .hash_algorithm()
            .ok_or_else(|| Error::FingerprintMismatch(format!("unknown algorithm {}", self.algorithm)))?;
        let actual = hash.digest(der);
        if actual != self.digest {
            return Err(Error::FingerprintMismatch(format!(
                "expected {} {}, got {}",
                self.algorithm,
                self.value(),
                RTCDtlsFingerprint::new(hash.name(), actual).value()
            )));
        }
        Ok(())
    }
}

/// Formats as `<algorithm> <value>`, the `a=fingerprint:` attribute value.
impl fmt::Display for RTCDtlsFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.algorithm, self.value())
    }
}

impl FromStr for RTCDtlsFingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("a=fingerprint:").unwrap_or(s);
        match s.split_once(' ') {
            Some((algorithm, value)) => RTCDtlsFingerprint::parse(algorithm, value.trim()),
            None => Err(Error::ErrInvalidFingerprint(s.to_owned())),
        }
    }
}

/// verify_certificate_fingerprint succeeds iff both a certificate and a
/// fingerprint are present and the certificate hashes to the fingerprint's
/// digest under its algorithm.
pub fn verify_certificate_fingerprint(
    der: Option<&[u8]>,
    fingerprint: Option<&RTCDtlsFingerprint>,
) -> Result<()> {
    match (der, fingerprint) {
        (Some(der), Some(fingerprint)) => fingerprint.verify(der),
        (None, _) => Err(Error::FingerprintMismatch("no certificate".to_owned())),
        (_, None) => Err(Error::FingerprintMismatch("no fingerprint".to_owned())),
    }
}
