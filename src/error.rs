use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a pair of `setup:` attributes could not be turned into a DTLS role.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoleRejection {
    /// Both sides asked for the same role.
    DuplicateRole,
    /// The offerer did not use actpass, or used a role the answerer cannot take.
    OffererNotActpass,
    /// The answerer did not pick active or passive.
    AnswererNotConcrete,
    /// A later negotiation tried to reverse the negotiated role.
    RoleChange,
    /// The offer came from an endpoint that omitted the setup attribute.
    LegacyPeer,
    /// Neither or both descriptions are offers.
    NoOfferer,
}

impl fmt::Display for RoleRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RoleRejection::DuplicateRole => "both sides use the same setup role",
            RoleRejection::OffererNotActpass => "offerer must use actpass for the setup attribute",
            RoleRejection::AnswererNotConcrete => {
                "answerer must use either active or passive for the setup attribute"
            }
            RoleRejection::RoleChange => "setup attribute would change the negotiated DTLS role",
            RoleRejection::LegacyPeer => "offer without setup attribute",
            RoleRejection::NoOfferer => "role negotiation needs exactly one offer",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A method was called in a state that does not accept it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// No offered crypto line matches the answer.
    #[error("no offered crypto parameters match the answer")]
    ErrCryptoMismatch,

    /// Malformed `inline:` key, wrong key length or unknown suite.
    #[error("invalid crypto parameters: {0}")]
    InvalidCryptoParams(String),

    /// Certificate and fingerprint are missing or do not match.
    #[error("fingerprint mismatch: {0}")]
    FingerprintMismatch(String),

    #[error("DTLS role negotiation failed: {0}")]
    RoleNegotiationFailed(RoleRejection),

    /// Bad ICE ufrag/pwd.
    #[error("invalid ICE parameters: {0}")]
    IceParameter(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported hash algorithm: {0}")]
    ErrUnsupportedHashAlgorithm(String),

    #[error("invalid fingerprint: {0}")]
    ErrInvalidFingerprint(String),

    #[error("private key type not supported")]
    ErrPrivateKeyType,

    #[error("certificate error: {0}")]
    ErrCertificate(String),

    #[error("replay protection window must be 0 or between {0} and {1}")]
    ErrReplayWindowSize(usize, usize),

    #[error("SrtpError: {0}")]
    ErrSrtpError(#[from] srtp::Error),

    #[error("KeyingMaterialExporterError: {0}")]
    ErrKeyingMaterial(#[from] util::KeyingMaterialExporterError),

    #[error("Other errors: {0}")]
    ErrOthers(String),
}

impl Error {
    pub fn new(message: String) -> Self {
        Error::ErrOthers(message)
    }
}

impl From<rcgen::Error> for Error {
    fn from(e: rcgen::Error) -> Self {
        Error::ErrCertificate(e.to_string())
    }
}
