use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sdp::connection_role::ConnectionRole;

/// DtlsRole indicates which side of the DTLS handshake a transport plays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DtlsRole {
    /// DtlsRoleClient sends the ClientHello.
    Client,

    /// DtlsRoleServer waits for the ClientHello.
    Server,
}

/// https://tools.ietf.org/html/rfc5763
/// The answerer MUST use either a
/// setup attribute value of setup:active or setup:passive.  Note that
/// if the answerer uses setup:passive, then the DTLS handshake will
/// not begin until the answerer is received, which adds additional
/// latency. setup:active allows the answer and the DTLS handshake to
/// occur in parallel.  Thus, setup:active is RECOMMENDED.
pub const DEFAULT_DTLS_ROLE_ANSWER: ConnectionRole = ConnectionRole::Active;

/// The endpoint that is the offerer MUST use the setup attribute
/// value of setup:actpass and be prepared to receive a client_hello
/// before it receives the answer.
pub const DEFAULT_DTLS_ROLE_OFFER: ConnectionRole = ConnectionRole::Actpass;

impl DtlsRole {
    /// The setup attribute a description should carry to keep this role.
    pub fn connection_role(&self) -> ConnectionRole {
        match *self {
            DtlsRole::Client => ConnectionRole::Active,
            DtlsRole::Server => ConnectionRole::Passive,
        }
    }

    /// The role the peer must play against this one.
    pub fn opposite(&self) -> Self {
        match *self {
            DtlsRole::Client => DtlsRole::Server,
            DtlsRole::Server => DtlsRole::Client,
        }
    }
}

impl fmt::Display for DtlsRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DtlsRole::Client => write!(f, "Client"),
            DtlsRole::Server => write!(f, "Server"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dtls_role_string() {
        let tests = vec![(DtlsRole::Client, "Client"), (DtlsRole::Server, "Server")];

        for (role, expected_string) in tests {
            assert_eq!(expected_string, role.to_string())
        }
    }

    #[test]
    fn test_dtls_role_connection_role() {
        assert_eq!(DtlsRole::Client.connection_role(), ConnectionRole::Active);
        assert_eq!(DtlsRole::Server.connection_role(), ConnectionRole::Passive);
        assert_eq!(DtlsRole::Client.opposite(), DtlsRole::Server);
    }
}
