
use std::fmt;

/// ProtectionProfile specifies Cipher and AuthTag details, similar to TLS cipher suite.
/// The discriminant is the DTLS-SRTP profile identifier (RFC 5764 section 4.1.2,
/// RFC 7714 section 14.2).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ProtectionProfile {
    #[default]
    Aes128CmHmacSha1_80 = 0x0001,
    Aes128CmHmacSha1_32 = 0x0002,
    AeadAes128Gcm = 0x0007,
    AeadAes256Gcm = 0x0008,
}

pub const SRTP_AES128_CM_HMAC_SHA1_80: &str = "AES_CM_128_HMAC_SHA1_80";
pub const SRTP_AES128_CM_HMAC_SHA1_32: &str = "AES_CM_128_HMAC_SHA1_32";
pub const SRTP_AEAD_AES_128_GCM: &str = "AEAD_AES_128_GCM";
pub const SRTP_AEAD_AES_256_GCM: &str = "AEAD_AES_256_GCM";

impl ProtectionProfile {
    pub const ALL: [ProtectionProfile; 4] = [
        ProtectionProfile::Aes128CmHmacSha1_80,
        ProtectionProfile::Aes128CmHmacSha1_32,
        ProtectionProfile::AeadAes128Gcm,
        ProtectionProfile::AeadAes256Gcm,
    ];

    pub fn key_len(&self) -> usize {
        match *self {
            ProtectionProfile::Aes128CmHmacSha1_32
            | ProtectionProfile::Aes128CmHmacSha1_80
            | ProtectionProfile::AeadAes128Gcm => 16,
            ProtectionProfile::AeadAes256Gcm => 32,
        }
    }

    pub fn salt_len(&self) -> usize {
        match *self {
            ProtectionProfile::Aes128CmHmacSha1_32 | ProtectionProfile::Aes128CmHmacSha1_80 => 14,
            ProtectionProfile::AeadAes128Gcm | ProtectionProfile::AeadAes256Gcm => 12,
        }
    }

    pub fn rtp_auth_tag_len(&self) -> usize {
        match *self {
            ProtectionProfile::Aes128CmHmacSha1_80 => 10,
            ProtectionProfile::Aes128CmHmacSha1_32 => 4,
            ProtectionProfile::AeadAes128Gcm | ProtectionProfile::AeadAes256Gcm => 0,
        }
    }

    pub fn rtcp_auth_tag_len(&self) -> usize {
        match *self {
            ProtectionProfile::Aes128CmHmacSha1_80 | ProtectionProfile::Aes128CmHmacSha1_32 => 10,
            ProtectionProfile::AeadAes128Gcm | ProtectionProfile::AeadAes256Gcm => 0,
        }
    }

    pub fn aead_auth_tag_len(&self) -> usize {
        match *self {
            ProtectionProfile::Aes128CmHmacSha1_80 | ProtectionProfile::Aes128CmHmacSha1_32 => 0,
            ProtectionProfile::AeadAes128Gcm | ProtectionProfile::AeadAes256Gcm => 16,
        }
    }

    pub fn auth_key_len(&self) -> usize {
        match *self {
            ProtectionProfile::Aes128CmHmacSha1_80 | ProtectionProfile::Aes128CmHmacSha1_32 => 20,
            ProtectionProfile::AeadAes128Gcm | ProtectionProfile::AeadAes256Gcm => 0,
        }
    }

    /// Total key plus salt length, the size of one side's keying material.
    pub fn master_len(&self) -> usize {
        self.key_len() + self.salt_len()
    }

    pub fn is_aead(&self) -> bool {
        self.aead_auth_tag_len() != 0
    }

    /// Largest number of bytes protect_rtp may append to a packet.
    pub fn rtp_overhead(&self) -> usize {
        self.rtp_auth_tag_len() + self.aead_auth_tag_len()
    }

    /// Bytes protect_rtcp appends: the E|index word and the tag.
    pub fn rtcp_overhead(&self) -> usize {
        crate::key_derivation::SRTCP_INDEX_SIZE + self.rtcp_auth_tag_len() + self.aead_auth_tag_len()
    }

    pub fn id(&self) -> u16 {
        *self as u16
    }

    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// The SDES crypto suite name.
    pub fn name(&self) -> &'static str {
        match *self {
            ProtectionProfile::Aes128CmHmacSha1_80 => SRTP_AES128_CM_HMAC_SHA1_80,
            ProtectionProfile::Aes128CmHmacSha1_32 => SRTP_AES128_CM_HMAC_SHA1_32,
            ProtectionProfile::AeadAes128Gcm => SRTP_AEAD_AES_128_GCM,
            ProtectionProfile::AeadAes256Gcm => SRTP_AEAD_AES_256_GCM,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for ProtectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
