use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

pub const ICE_UFRAG_MIN_LENGTH: usize = 4;
pub const ICE_PWD_MIN_LENGTH: usize = 22;
pub const ICE_UFRAG_MAX_LENGTH: usize = 256;
pub const ICE_PWD_MAX_LENGTH: usize = 256;

/// IceMode tells whether an agent runs full ICE or ICE-lite (RFC 8445 2.5).
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IceMode {
    #[default]
    Full,
    Lite,
}

impl fmt::Display for IceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IceMode::Full => write!(f, "full"),
            IceMode::Lite => write!(f, "lite"),
        }
    }
}

/// RTCIceParameters includes the ICE username fragment
/// and password and other ICE-related parameters.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCIceParameters {
    pub username_fragment: String,
    pub password: String,
    pub ice_mode: IceMode,
}

impl RTCIceParameters {
    /// validate checks the credential lengths of RFC 5245 section 15.4.
    /// Empty credentials are accepted for endpoints that do not use ICE.
    pub fn validate(&self) -> Result<()> {
        if self.username_fragment.is_empty() && self.password.is_empty() {
            return Ok(());
        }

        let ufrag_len = self.username_fragment.len();
        if !(ICE_UFRAG_MIN_LENGTH..=ICE_UFRAG_MAX_LENGTH).contains(&ufrag_len) {
            return Err(Error::IceParameter(format!(
                "ice ufrag must be {ICE_UFRAG_MIN_LENGTH}..={ICE_UFRAG_MAX_LENGTH} characters, got {ufrag_len}"
            )));
        }

        let pwd_len = self.password.len();
        if !(ICE_PWD_MIN_LENGTH..=ICE_PWD_MAX_LENGTH).contains(&pwd_len) {
            return Err(Error::IceParameter(format!(
                "ice pwd must be {ICE_PWD_MIN_LENGTH}..={ICE_PWD_MAX_LENGTH} characters, got {pwd_len}"
            )));
        }

        Ok(())
    }

    /// Whether switching from `self` to `other` restarts ICE.
    pub fn credentials_changed(&self, other: &RTCIceParameters) -> bool {
        self.username_fragment != other.username_fragment || self.password != other.password
    }
}
