use serde::{Deserialize, Serialize};

use crate::certificate::RTCCertificate;
use crate::ice_transport::ice_candidate::RTCIceCandidate;

/// IceTransportStats is what one ICE transport reports about itself.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceTransportStats {
    pub component: u16,
    pub local_candidates: Vec<RTCIceCandidate>,
    pub remote_candidates: Vec<RTCIceCandidate>,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// TransportChannelStats describes one live ICE component of a transport.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportChannelStats {
    pub component: u16,
    pub dtls_state: String,
    pub dtls_role: Option<String>,
    /// Name of the negotiated DTLS-SRTP profile, if any.
    pub srtp_cipher: Option<String>,
    pub ice_transport_stats: IceTransportStats,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportStats {
    pub transport_name: String,
    pub channel_stats: Vec<TransportChannelStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateStats {
    pub id: String,
    pub fingerprint: String,
    pub fingerprint_algorithm: String,
}

impl CertificateStats {
    pub fn new(cert: &RTCCertificate) -> Self {
        let fingerprint = cert.fingerprint(cert.signature_hash_algorithm());
        CertificateStats {
            id: cert.stats_id().to_owned(),
            fingerprint: fingerprint.value(),
            fingerprint_algorithm: fingerprint.algorithm,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_transport_stats_serialize_camel_case() {
        let stats = TransportStats {
            transport_name: "audio".to_owned(),
            channel_stats: vec![TransportChannelStats {
                component: 1,
                dtls_state: "connected".to_owned(),
                dtls_role: Some("Client".to_owned()),
                srtp_cipher: Some("AES_CM_128_HMAC_SHA1_80".to_owned()),
                ice_transport_stats: IceTransportStats {
                    component: 1,
                    ..Default::default()
                },
            }],
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["transportName"], "audio");
        assert_eq!(json["channelStats"][0]["dtlsState"], "connected");
        assert_eq!(json["channelStats"][0]["srtpCipher"], "AES_CM_128_HMAC_SHA1_80");
        assert_eq!(json["channelStats"][0]["iceTransportStats"]["bytesSent"], 0);

        let back: TransportStats = serde_json::from_value(json).unwrap();
        assert_eq!(back, stats);
    }
}
