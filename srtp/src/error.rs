use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("session is already configured")]
    ErrSessionAlreadyConfigured,
    #[error("session is not configured")]
    ErrSessionNotConfigured,
    #[error("session has failed and must be reset")]
    ErrSessionFailed,
    #[error("session is not a send session")]
    ErrNotSendSession,
    #[error("session is not a receive session")]
    ErrNotRecvSession,
    #[error("crypto suite can not change on update")]
    ErrCryptoSuiteChanged,
    #[error("external authentication is not active")]
    ErrExternalAuthNotActive,
    #[error("key usage limit reached")]
    ErrKeyExpired,
    #[error("crypto backend self test failed")]
    ErrBackendInitFailed,
    #[error("packet is too short to be rtp packet")]
    ErrTooShortRtp,
    #[error("packet is too short to be rtcp packet")]
    ErrTooShortRtcp,
    #[error("malformed rtp header extension")]
    ErrHeaderExtensionMalformed,
    #[error("keying material is shorter than the profile requires")]
    ErrShortKeyingMaterial,

    #[error("index_over_kdr > 0 is not supported yet")]
    UnsupportedIndexOverKdr,
    #[error("unsupported crypto suite: {0}")]
    UnsupportedSuite(String),
    #[error("SRTP Master Key must be len {0}, got {1}")]
    SrtpMasterKeyLength(usize, usize),
    #[error("SRTP Salt must be len {0}, got {1}")]
    SrtpSaltLength(usize, usize),
    #[error("replay window size must be within 64..=32768, got {0}")]
    ErrReplayWindowSize(usize),
    #[error("buffer too small: need {0} bytes, have {1}")]
    BufferTooSmall(usize, usize),
    #[error("too short SRTP packet: only {0} bytes, expected > {1} bytes")]
    SrtpTooSmall(usize, usize),
    #[error("too short SRTCP packet: only {0} bytes, expected > {1} bytes")]
    SrtcpTooSmall(usize, usize),
    #[error("ssrc={0} index={1}: replayed packet")]
    ReplayFail(u32, u64),
    #[error("ssrc={0} index={1}: packet too old for the replay window")]
    ReplayOld(u32, u64),
    #[error("failed to verify rtp auth tag")]
    RtpFailedToVerifyAuthTag,
    #[error("failed to verify rtcp auth tag")]
    RtcpFailedToVerifyAuthTag,
    #[error("internal crypto error: {0}")]
    InternalCrypto(String),

    #[error("{0}")]
    KeyingMaterial(#[from] util::KeyingMaterialExporterError),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error is an authentication failure of either packet type.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Error::RtpFailedToVerifyAuthTag | Error::RtcpFailedToVerifyAuthTag
        )
    }

    /// Whether the error is a replay rejection.
    pub fn is_replay(&self) -> bool {
        matches!(self, Error::ReplayFail(..) | Error::ReplayOld(..))
    }
}
