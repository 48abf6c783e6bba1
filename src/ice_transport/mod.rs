#[cfg(test)]
pub(crate) mod fake_ice_transport;

pub mod ice_candidate;
pub mod ice_parameters;

use ice_candidate::RTCIceCandidate;
use ice_parameters::RTCIceParameters;

use crate::error::Result;
use crate::stats::IceTransportStats;

/// IceTransport is the part of an ICE transport a JsepTransport drives:
/// it pushes credentials and remote candidates and reads statistics.
pub trait IceTransport {
    /// The ICE component this transport carries, 1 for RTP and 2 for RTCP.
    fn component(&self) -> u16;

    fn set_ice_parameters(&mut self, params: &RTCIceParameters);

    fn set_remote_ice_parameters(&mut self, params: &RTCIceParameters);

    fn add_remote_candidate(&mut self, candidate: RTCIceCandidate) -> Result<()>;

    fn stats(&self) -> IceTransportStats;
}
