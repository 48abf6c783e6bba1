use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dtls_transport::dtls_fingerprint::RTCDtlsFingerprint;
use crate::ice_transport::ice_parameters::{IceMode, RTCIceParameters};
use crate::sdp::connection_role::ConnectionRole;
use crate::sdp::crypto_params::CryptoParams;

/// ContentSource tells whether a description was produced locally or
/// received from the peer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentSource {
    Local,
    Remote,
}

impl ContentSource {
    /// The other party of the exchange.
    pub fn opposite(&self) -> Self {
        match *self {
            ContentSource::Local => ContentSource::Remote,
            ContentSource::Remote => ContentSource::Local,
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ContentSource::Local => write!(f, "local"),
            ContentSource::Remote => write!(f, "remote"),
        }
    }
}

/// TransportDescription holds the transport level attributes of one media
/// section: ICE credentials, the `setup:` role and the certificate
/// fingerprint.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportDescription {
    pub ice_ufrag: String,
    pub ice_pwd: String,
    pub ice_mode: IceMode,
    pub connection_role: ConnectionRole,
    pub identity_fingerprint: Option<RTCDtlsFingerprint>,
    pub transport_options: Vec<String>,
}

impl TransportDescription {
    pub fn new(ice_ufrag: &str, ice_pwd: &str) -> Self {
        TransportDescription {
            ice_ufrag: ice_ufrag.to_owned(),
            ice_pwd: ice_pwd.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: ConnectionRole) -> Self {
        self.connection_role = role;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: Option<RTCDtlsFingerprint>) -> Self {
        self.identity_fingerprint = fingerprint;
        self
    }

    pub fn ice_parameters(&self) -> RTCIceParameters {
        RTCIceParameters {
            username_fragment: self.ice_ufrag.clone(),
            password: self.ice_pwd.clone(),
            ice_mode: self.ice_mode,
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.transport_options.iter().any(|o| o == option)
    }
}

/// JsepTransportDescription is everything a JsepTransport consumes from one
/// side of the offer/answer exchange.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsepTransportDescription {
    pub rtcp_mux_enabled: bool,
    pub cryptos: Vec<CryptoParams>,
    pub encrypted_header_extension_ids: Vec<u8>,
    pub transport_desc: TransportDescription,
}

impl JsepTransportDescription {
    pub fn new(
        rtcp_mux_enabled: bool,
        cryptos: Vec<CryptoParams>,
        transport_desc: TransportDescription,
    ) -> Self {
        JsepTransportDescription {
            rtcp_mux_enabled,
            cryptos,
            encrypted_header_extension_ids: vec![],
            transport_desc,
        }
    }
}
