use util::KeyingMaterialExporterError;

use super::*;
use crate::error::Error;
use crate::ice_transport::fake_ice_transport::FakeIceTransport;

/// FakeDtlsTransport pretends to run a handshake. Two fakes created with the
/// same `secret` export the same keying material, like the two ends of a
/// real DTLS association.
#[derive(Debug)]
pub(crate) struct FakeDtlsTransport {
    pub(crate) ice: FakeIceTransport,
    pub(crate) state: DtlsTransportState,
    pub(crate) local_certificate: Option<RTCCertificate>,
    pub(crate) role: Option<DtlsRole>,
    pub(crate) remote_fingerprint: Option<RTCDtlsFingerprint>,
    pub(crate) peer_certificate: Option<Vec<u8>>,
    pub(crate) srtp_profile: Option<ProtectionProfile>,
    pub(crate) secret: u8,
    /// Makes set_dtls_role fail, as a transport whose handshake already
    /// started would.
    pub(crate) reject_dtls_role: bool,
}

impl FakeDtlsTransport {
    pub(crate) fn new(name: &str, component: u16) -> Self {
        FakeDtlsTransport {
            ice: FakeIceTransport::new(name, component),
            state: DtlsTransportState::New,
            local_certificate: None,
            role: None,
            remote_fingerprint: None,
            peer_certificate: None,
            srtp_profile: None,
            secret: 0,
            reject_dtls_role: false,
        }
    }

    /// Completes the handshake against a peer holding `peer_certificate`.
    pub(crate) fn connect(&mut self, peer_certificate: &RTCCertificate, profile: ProtectionProfile) {
        self.state = DtlsTransportState::Connected;
        self.peer_certificate = Some(peer_certificate.der().to_vec());
        self.srtp_profile = Some(profile);
    }
}

impl KeyingMaterialExporter for FakeDtlsTransport {
    fn export_keying_material(
        &self,
        label: &str,
        _context: &[u8],
        length: usize,
    ) -> std::result::Result<Vec<u8>, KeyingMaterialExporterError> {
        if !self.state.is_connected() {
            return Err(KeyingMaterialExporterError::HandshakeInProgress);
        }
        let seed = label.len() as u8 ^ self.secret;
        Ok((0..length)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect())
    }
}

impl DtlsTransport for FakeDtlsTransport {
    type Ice = FakeIceTransport;

    fn state(&self) -> DtlsTransportState {
        self.state
    }

    fn set_local_certificate(&mut self, certificate: &RTCCertificate) -> Result<()> {
        self.local_certificate = Some(certificate.clone());
        Ok(())
    }

    fn set_dtls_role(&mut self, role: DtlsRole) -> Result<()> {
        if self.reject_dtls_role {
            return Err(Error::InvalidState("handshake started".to_owned()));
        }
        self.role = Some(role);
        Ok(())
    }

    fn dtls_role(&self) -> Option<DtlsRole> {
        self.role
    }

    fn set_remote_fingerprint(&mut self, fingerprint: &RTCDtlsFingerprint) -> Result<()> {
        self.remote_fingerprint = Some(fingerprint.clone());
        Ok(())
    }

    fn remote_fingerprint(&self) -> Option<&RTCDtlsFingerprint> {
        self.remote_fingerprint.as_ref()
    }

    fn peer_certificate(&self) -> Option<&[u8]> {
        self.peer_certificate.as_deref()
    }

    fn srtp_profile(&self) -> Option<ProtectionProfile> {
        self.srtp_profile
    }

    fn ice_transport(&self) -> &Self::Ice {
        &self.ice
    }

    fn ice_transport_mut(&mut self) -> &mut Self::Ice {
        &mut self.ice
    }
}
