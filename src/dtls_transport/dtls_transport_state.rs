use std::fmt;

/// DtlsTransportState indicates the DTLS transport establishment state.
///
/// [W3C]: https://w3c.github.io/webrtc-pc/#dom-rtcdtlstransportstate
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DtlsTransportState {
    #[default]
    Unspecified,

    /// DTLS has not started negotiating yet.
    New,

    /// The handshake is running.
    Connecting,

    /// The handshake finished; keying material can be exported.
    Connected,

    Closed,

    /// Handshake or fingerprint validation failed.
    Failed,
}

const DTLS_TRANSPORT_STATE_NEW_STR: &str = "new";
const DTLS_TRANSPORT_STATE_CONNECTING_STR: &str = "connecting";
const DTLS_TRANSPORT_STATE_CONNECTED_STR: &str = "connected";
const DTLS_TRANSPORT_STATE_CLOSED_STR: &str = "closed";
const DTLS_TRANSPORT_STATE_FAILED_STR: &str = "failed";

impl DtlsTransportState {
    pub fn is_connected(&self) -> bool {
        *self == DtlsTransportState::Connected
    }
}

impl From<&str> for DtlsTransportState {
    fn from(raw: &str) -> Self {
        match raw {
            DTLS_TRANSPORT_STATE_NEW_STR => DtlsTransportState::New,
            DTLS_TRANSPORT_STATE_CONNECTING_STR => DtlsTransportState::Connecting,
            DTLS_TRANSPORT_STATE_CONNECTED_STR => DtlsTransportState::Connected,
            DTLS_TRANSPORT_STATE_CLOSED_STR => DtlsTransportState::Closed,
            DTLS_TRANSPORT_STATE_FAILED_STR => DtlsTransportState::Failed,
            _ => DtlsTransportState::Unspecified,
        }
    }
}

impl fmt::Display for DtlsTransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            DtlsTransportState::New => DTLS_TRANSPORT_STATE_NEW_STR,
            DtlsTransportState::Connecting => DTLS_TRANSPORT_STATE_CONNECTING_STR,
            DtlsTransportState::Connected => DTLS_TRANSPORT_STATE_CONNECTED_STR,
            DtlsTransportState::Closed => DTLS_TRANSPORT_STATE_CLOSED_STR,
            DtlsTransportState::Failed => DTLS_TRANSPORT_STATE_FAILED_STR,
            DtlsTransportState::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}
