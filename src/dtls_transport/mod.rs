#[cfg(test)]
pub(crate) mod fake_dtls_transport;

pub mod dtls_fingerprint;
pub mod dtls_role;
pub mod dtls_transport_state;

use dtls_fingerprint::RTCDtlsFingerprint;
use dtls_role::DtlsRole;
use dtls_transport_state::DtlsTransportState;
use srtp::ProtectionProfile;
use util::KeyingMaterialExporter;

use crate::certificate::RTCCertificate;
use crate::error::Result;
use crate::ice_transport::IceTransport;

/// DtlsTransport is what a JsepTransport needs from the DTLS layer of one
/// ICE component. The handshake itself runs elsewhere; the JsepTransport
/// only configures it and reads its outcome.
pub trait DtlsTransport: KeyingMaterialExporter {
    type Ice: IceTransport;

    fn state(&self) -> DtlsTransportState;

    fn set_local_certificate(&mut self, certificate: &RTCCertificate) -> Result<()>;

    fn set_dtls_role(&mut self, role: DtlsRole) -> Result<()>;

    fn dtls_role(&self) -> Option<DtlsRole>;

    /// The fingerprint the peer's certificate is expected to hash to.
    fn set_remote_fingerprint(&mut self, fingerprint: &RTCDtlsFingerprint) -> Result<()>;

    fn remote_fingerprint(&self) -> Option<&RTCDtlsFingerprint>;

    /// DER encoding of the certificate the peer presented, once the
    /// handshake got that far.
    fn peer_certificate(&self) -> Option<&[u8]>;

    /// The DTLS-SRTP profile agreed in the handshake.
    fn srtp_profile(&self) -> Option<ProtectionProfile>;

    fn ice_transport(&self) -> &Self::Ice;

    fn ice_transport_mut(&mut self) -> &mut Self::Ice;

    fn component(&self) -> u16 {
        self.ice_transport().component()
    }
}
