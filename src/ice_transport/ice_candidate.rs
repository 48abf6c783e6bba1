use serde::{Deserialize, Serialize};
use std::fmt;

/// ICE component ids, RFC 8445 section 5.1.1.1.
pub const ICE_CANDIDATE_COMPONENT_RTP: u16 = 1;
pub const ICE_CANDIDATE_COMPONENT_RTCP: u16 = 2;

/// RTCIceCandidate is a remote candidate handed to the ICE transport of the
/// matching component.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCIceCandidate {
    pub foundation: String,
    pub component: u16,
    pub protocol: String,
    pub priority: u32,
    pub address: String,
    pub port: u16,
    pub typ: String,
}

impl RTCIceCandidate {
    pub fn new(component: u16, address: &str, port: u16) -> Self {
        RTCIceCandidate {
            foundation: "1".to_owned(),
            component,
            protocol: "udp".to_owned(),
            priority: 0,
            address: address.to_owned(),
            port,
            typ: "host".to_owned(),
        }
    }
}

impl fmt::Display for RTCIceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} typ {}",
            self.foundation,
            self.component,
            self.protocol,
            self.priority,
            self.address,
            self.port,
            self.typ
        )
    }
}
