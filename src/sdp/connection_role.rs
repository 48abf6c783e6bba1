use serde::{Deserialize, Serialize};
use std::fmt;

/// ConnectionRole is the value of the `a=setup:` attribute ([RFC 4145]).
///
/// `Unspecified` stands for a description without the attribute, as sent
/// by endpoints that predate DTLS-SRTP role negotiation.
///
/// [RFC 4145]: https://tools.ietf.org/html/rfc4145#section-4
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionRole {
    #[default]
    Unspecified,

    /// The endpoint will initiate an outgoing connection.
    Active,

    /// The endpoint will accept an incoming connection.
    Passive,

    /// The endpoint is willing to accept an incoming connection or to
    /// initiate an outgoing connection.
    Actpass,

    /// The endpoint does not want the connection to be established for the
    /// time being.
    Holdconn,
}

const CONNECTION_ROLE_ACTIVE_STR: &str = "active";
const CONNECTION_ROLE_PASSIVE_STR: &str = "passive";
const CONNECTION_ROLE_ACTPASS_STR: &str = "actpass";
const CONNECTION_ROLE_HOLDCONN_STR: &str = "holdconn";

impl ConnectionRole {
    /// Whether the role names exactly one side of the DTLS handshake.
    pub fn is_concrete(&self) -> bool {
        matches!(self, ConnectionRole::Active | ConnectionRole::Passive)
    }
}

impl From<&str> for ConnectionRole {
    fn from(raw: &str) -> Self {
        match raw {
            CONNECTION_ROLE_ACTIVE_STR => ConnectionRole::Active,
            CONNECTION_ROLE_PASSIVE_STR => ConnectionRole::Passive,
            CONNECTION_ROLE_ACTPASS_STR => ConnectionRole::Actpass,
            CONNECTION_ROLE_HOLDCONN_STR => ConnectionRole::Holdconn,
            _ => ConnectionRole::Unspecified,
        }
    }
}

impl fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            ConnectionRole::Active => CONNECTION_ROLE_ACTIVE_STR,
            ConnectionRole::Passive => CONNECTION_ROLE_PASSIVE_STR,
            ConnectionRole::Actpass => CONNECTION_ROLE_ACTPASS_STR,
            ConnectionRole::Holdconn => CONNECTION_ROLE_HOLDCONN_STR,
            ConnectionRole::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}
