use super::*;

/// FakeIceTransport records what it is given.
#[derive(Debug, Default)]
pub(crate) struct FakeIceTransport {
    pub(crate) name: String,
    pub(crate) component: u16,
    pub(crate) local_params: Option<RTCIceParameters>,
    pub(crate) remote_params: Option<RTCIceParameters>,
    pub(crate) remote_candidates: Vec<RTCIceCandidate>,
}

impl FakeIceTransport {
    pub(crate) fn new(name: &str, component: u16) -> Self {
        FakeIceTransport {
            name: name.to_owned(),
            component,
            ..Default::default()
        }
    }
}

impl IceTransport for FakeIceTransport {
    fn component(&self) -> u16 {
        self.component
    }

    fn set_ice_parameters(&mut self, params: &RTCIceParameters) {
        self.local_params = Some(params.clone());
    }

    fn set_remote_ice_parameters(&mut self, params: &RTCIceParameters) {
        self.remote_params = Some(params.clone());
    }

    fn add_remote_candidate(&mut self, candidate: RTCIceCandidate) -> Result<()> {
        self.remote_candidates.push(candidate);
        Ok(())
    }

    fn stats(&self) -> IceTransportStats {
        IceTransportStats {
            component: self.component,
            remote_candidates: self.remote_candidates.clone(),
            ..Default::default()
        }
    }
}
