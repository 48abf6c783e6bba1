#[cfg(test)]
mod crypto_params_test;

use std::fmt;
use std::str::FromStr;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use rand::Rng;
use serde::{Deserialize, Serialize};
use srtp::ProtectionProfile;

use crate::error::{Error, Result};

pub const ATTR_KEY_CRYPTO: &str = "crypto";
const INLINE_PREFIX: &str = "inline:";

/// CryptoParams is one `a=crypto:` line of an SDES offer or answer
/// ([RFC 4568]).
///
/// [RFC 4568]: https://tools.ietf.org/html/rfc4568#section-9.1
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoParams {
    pub tag: u32,
    pub cipher_suite: String,
    /// `inline:<base64(key||salt)>` optionally followed by `|lifetime` and
    /// `|mki:length`.
    pub key_params: String,
    pub session_params: String,
}

impl CryptoParams {
    pub fn new(tag: u32, cipher_suite: &str, key_params: &str) -> Self {
        CryptoParams {
            tag,
            cipher_suite: cipher_suite.to_owned(),
            key_params: key_params.to_owned(),
            session_params: String::new(),
        }
    }

    /// generate creates a line for `profile` carrying fresh random key
    /// material.
    pub fn generate(tag: u32, profile: ProtectionProfile) -> Self {
        let mut master = vec![0u8; profile.master_len()];
        rand::rng().fill(&mut master[..]);
        let key_params = format!("{INLINE_PREFIX}{}", BASE64_STANDARD.encode(&master));
        CryptoParams::new(tag, profile.name(), &key_params)
    }

    pub fn profile(&self) -> Option<ProtectionProfile> {
        ProtectionProfile::from_name(&self.cipher_suite)
    }

    /// decode_key_params returns the (master key, master salt) pair carried by
    /// `key_params`. The base64 payload is decoded strictly and must hold
    /// exactly key_len + salt_len bytes for the suite.
    pub fn decode_key_params(&self) -> Result<(ProtectionProfile, Vec<u8>, Vec<u8>)> {
        let profile = self.profile().ok_or_else(|| {
            Error::InvalidCryptoParams(format!("unsupported cipher suite {}", self.cipher_suite))
        })?;

        let encoded = self
            .key_params
            .strip_prefix(INLINE_PREFIX)
            .ok_or_else(|| Error::InvalidCryptoParams("key params must be inline".to_owned()))?;
        let encoded = encoded.split('|').next().unwrap_or_default();

        let mut master = BASE64_STANDARD
            .decode(encoded)
            .map_err(|e| Error::InvalidCryptoParams(format!("bad base64 key: {e}")))?;
        if master.len() != profile.master_len() {
            return Err(Error::InvalidCryptoParams(format!(
                "{} needs {} bytes of key and salt, got {}",
                profile,
                profile.master_len(),
                master.len()
            )));
        }

        let salt = master.split_off(profile.key_len());
        Ok((profile, master, salt))
    }

    /// matches reports whether an answered line selects this offered line:
    /// same tag, same suite, and both keys are usable for that suite.
    pub fn matches(&self, other: &CryptoParams) -> bool {
        self.tag == other.tag
            && self.cipher_suite == other.cipher_suite
            && self.decode_key_params().is_ok()
            && other.decode_key_params().is_ok()
    }
}

/// Formats the attribute value, without the `a=crypto:` prefix.
impl fmt::Display for CryptoParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.tag, self.cipher_suite, self.key_params)?;
        if !self.session_params.is_empty() {
            write!(f, " {}", self.session_params)?;
        }
        Ok(())
    }
}

/// Parses either a full `a=crypto:...` line or just its value.
impl FromStr for CryptoParams {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        let value = value.strip_prefix("a=").unwrap_or(value);
        let value = value
            .strip_prefix(ATTR_KEY_CRYPTO)
            .and_then(|v| v.strip_prefix(':'))
            .unwrap_or(value);

        let mut fields = value.split_whitespace();
        let (tag, cipher_suite, key_params) = match (fields.next(), fields.next(), fields.next()) {
            (Some(tag), Some(suite), Some(key_params)) => (tag, suite, key_params),
            _ => {
                return Err(Error::InvalidCryptoParams(format!(
                    "crypto line needs tag, suite and key params: {s}"
                )))
            }
        };

        let tag = tag
            .parse::<u32>()
            .map_err(|_| Error::InvalidCryptoParams(format!("bad crypto tag {tag}")))?;
        if !key_params.starts_with(INLINE_PREFIX) {
            return Err(Error::InvalidCryptoParams(format!(
                "unsupported key method in {key_params}"
            )));
        }

        Ok(CryptoParams {
            tag,
            cipher_suite: cipher_suite.to_owned(),
            key_params: key_params.to_owned(),
            session_params: fields.collect::<Vec<&str>>().join(" "),
        })
    }
}
