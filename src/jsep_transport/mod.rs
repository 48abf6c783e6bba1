
pub mod role_negotiation;

use std::fmt;

use srtp::config::Config;
use srtp::ProtectionProfile;

use crate::api::setting_engine::SettingEngine;
use crate::certificate::RTCCertificate;
use crate::dtls_transport::dtls_fingerprint::{verify_certificate_fingerprint, RTCDtlsFingerprint};
use crate::dtls_transport::dtls_role::DtlsRole;
use crate::dtls_transport::DtlsTransport;
use crate::error::{Error, Result};
use crate::ice_transport::ice_candidate::{
    RTCIceCandidate, ICE_CANDIDATE_COMPONENT_RTCP, ICE_CANDIDATE_COMPONENT_RTP,
};
use crate::ice_transport::IceTransport;
use crate::rtcp_mux_filter::RtcpMuxFilter;
use crate::sdp::sdp_type::SdpType;
use crate::sdp::transport_description::{ContentSource, JsepTransportDescription};
use crate::srtp_filter::SrtpFilter;
use crate::stats::{TransportChannelStats, TransportStats};
use role_negotiation::negotiate_role;

pub type OnRtcpMuxActiveHdlrFn = Box<dyn FnMut() + Send + 'static>;

/// SrtpMode is how a JsepTransport keys SRTP. It is fixed for the lifetime
/// of the transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SrtpMode {
    /// Keys travel in `a=crypto:` lines of the descriptions.
    Sdes,
    /// Keys are exported from the DTLS handshake.
    DtlsSrtp,
}

impl fmt::Display for SrtpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SrtpMode::Sdes => write!(f, "sdes"),
            SrtpMode::DtlsSrtp => write!(f, "dtls-srtp"),
        }
    }
}

/// A description together with the type it was applied as.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDescription {
    pub description: JsepTransportDescription,
    pub sdp_type: SdpType,
}

struct PendingAnswer {
    source: ContentSource,
    description: JsepTransportDescription,
    sdp_type: SdpType,
}

/// The DTLS outcome of one answer: the role to take and the fingerprint the
/// peer certificate must match.
struct DtlsParameters {
    role: DtlsRole,
    remote_fingerprint: RTCDtlsFingerprint,
}

/// JsepTransport applies local and remote transport descriptions to the
/// DTLS transports of one media section. It validates ICE credentials and
/// fingerprints, negotiates the DTLS role from the `setup:` attributes,
/// runs the rtcp-mux exchange and keys SRTP either from SDES crypto lines
/// or from the finished DTLS handshake.
///
/// Applying a description is all or nothing: a rejected description leaves
/// the transport as it was.
pub struct JsepTransport<D: DtlsTransport> {
    name: String,
    srtp_mode: SrtpMode,
    settings: SettingEngine,
    local_certificate: Option<RTCCertificate>,

    rtp_dtls_transport: D,
    rtcp_dtls_transport: Option<D>,

    local_description: Option<AppliedDescription>,
    remote_description: Option<AppliedDescription>,
    pending_answer: Option<PendingAnswer>,

    negotiated_dtls_role: Option<DtlsRole>,
    needs_ice_restart: bool,

    rtcp_mux_filter: RtcpMuxFilter,
    rtcp_mux_signalled: bool,
    on_rtcp_mux_active_handler: Option<OnRtcpMuxActiveHdlrFn>,

    srtp_filter: SrtpFilter,
}

/// What a DTLS transport held before new parameters were pushed to it.
struct DtlsSettings {
    role: Option<DtlsRole>,
    remote_fingerprint: Option<RTCDtlsFingerprint>,
}

impl DtlsSettings {
    fn of<D: DtlsTransport>(transport: &D) -> Self {
        DtlsSettings {
            role: transport.dtls_role(),
            remote_fingerprint: transport.remote_fingerprint().cloned(),
        }
    }

    fn restore<D: DtlsTransport>(self, name: &str, transport: &mut D) {
        if let Some(role) = self.role {
            if let Err(err) = transport.set_dtls_role(role) {
                log::warn!("transport {name}: failed to restore DTLS role {role}: {err}");
            }
        }
        if let Some(fingerprint) = &self.remote_fingerprint {
            if let Err(err) = transport.set_remote_fingerprint(fingerprint) {
                log::warn!("transport {name}: failed to restore remote fingerprint: {err}");
            }
        }
    }
}

struct DtlsSnapshot {
    negotiated_role: Option<DtlsRole>,
    rtp: DtlsSettings,
    rtcp: Option<DtlsSettings>,
}

impl<D: DtlsTransport> JsepTransport<D> {
    /// Creates a transport over `rtp_dtls_transport` and, unless RTCP is
    /// muxed from the start, `rtcp_dtls_transport`.
    pub fn new(
        name: &str,
        local_certificate: Option<RTCCertificate>,
        srtp_mode: SrtpMode,
        rtp_dtls_transport: D,
        rtcp_dtls_transport: Option<D>,
        settings: &SettingEngine,
    ) -> Result<Self> {
        let mut t = JsepTransport {
            name: name.to_owned(),
            srtp_mode,
            settings: settings.clone(),
            local_certificate: None,
            rtp_dtls_transport,
            rtcp_dtls_transport,
            local_description: None,
            remote_description: None,
            pending_answer: None,
            negotiated_dtls_role: None,
            needs_ice_restart: false,
            rtcp_mux_filter: RtcpMuxFilter::new(),
            rtcp_mux_signalled: false,
            on_rtcp_mux_active_handler: None,
            srtp_filter: SrtpFilter::new(settings),
        };
        if let Some(certificate) = local_certificate {
            t.set_local_certificate(certificate)?;
        }
        Ok(t)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn srtp_mode(&self) -> SrtpMode {
        self.srtp_mode
    }

    /// set_local_certificate must be called before a local description
    /// carrying a fingerprint is applied.
    pub fn set_local_certificate(&mut self, certificate: RTCCertificate) -> Result<()> {
        self.rtp_dtls_transport.set_local_certificate(&certificate)?;
        if let Some(rtcp) = &mut self.rtcp_dtls_transport {
            rtcp.set_local_certificate(&certificate)?;
        }
        self.local_certificate = Some(certificate);
        Ok(())
    }

    pub fn local_certificate(&self) -> Option<&RTCCertificate> {
        self.local_certificate.as_ref()
    }

    pub fn local_description(&self) -> Option<&AppliedDescription> {
        self.local_description.as_ref()
    }

    pub fn remote_description(&self) -> Option<&AppliedDescription> {
        self.remote_description.as_ref()
    }

    pub fn set_local_description(
        &mut self,
        description: JsepTransportDescription,
        sdp_type: SdpType,
    ) -> Result<()> {
        self.set_description(ContentSource::Local, description, sdp_type)
    }

    pub fn set_remote_description(
        &mut self,
        description: JsepTransportDescription,
        sdp_type: SdpType,
    ) -> Result<()> {
        self.set_description(ContentSource::Remote, description, sdp_type)
    }

    fn set_description(
        &mut self,
        source: ContentSource,
        description: JsepTransportDescription,
        sdp_type: SdpType,
    ) -> Result<()> {
        if sdp_type == SdpType::Unspecified {
            return Err(Error::InvalidParameter(format!(
                "{source} description of {} has no sdp type",
                self.name
            )));
        }

        // An answer that overtook its offer waits for it.
        if sdp_type.is_answer() && !self.has_offer_from(source.opposite()) {
            self.validate_description(source, &description)?;
            log::debug!(
                "transport {}: buffering {source} {sdp_type} until the {} offer arrives",
                self.name,
                source.opposite()
            );
            self.pending_answer = Some(PendingAnswer {
                source,
                description,
                sdp_type,
            });
            return Ok(());
        }

        self.apply_description(source, description, sdp_type)?;

        if sdp_type == SdpType::Offer {
            match self.pending_answer.take() {
                Some(pending) if pending.source != source => {
                    log::debug!(
                        "transport {}: applying buffered {} {}",
                        self.name,
                        pending.source,
                        pending.sdp_type
                    );
                    // The offer stands either way; a bad answer is dropped
                    // and the peer has to send a new one.
                    if let Err(err) =
                        self.apply_description(pending.source, pending.description, pending.sdp_type)
                    {
                        log::warn!(
                            "transport {}: dropping buffered {} {}: {err}",
                            self.name,
                            pending.source,
                            pending.sdp_type
                        );
                    }
                }
                Some(pending) => {
                    log::warn!(
                        "transport {}: dropping buffered {} {} superseded by a {source} offer",
                        self.name,
                        pending.source,
                        pending.sdp_type
                    );
                }
                None => {}
            }
        }
        Ok(())
    }

    fn has_offer_from(&self, source: ContentSource) -> bool {
        let applied = match source {
            ContentSource::Local => &self.local_description,
            ContentSource::Remote => &self.remote_description,
        };
        applied
            .as_ref()
            .is_some_and(|d| d.sdp_type == SdpType::Offer)
    }

    /// Checks that only need the description itself.
    fn validate_description(
        &self,
        source: ContentSource,
        description: &JsepTransportDescription,
    ) -> Result<()> {
        description.transport_desc.ice_parameters().validate()?;

        if self.srtp_mode == SrtpMode::DtlsSrtp && !description.cryptos.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "{source} description carries SDES crypto lines on DTLS-SRTP transport {}",
                self.name
            )));
        }

        if source == ContentSource::Local {
            if let Some(fingerprint) = &description.transport_desc.identity_fingerprint {
                let certificate = self.local_certificate.as_ref().ok_or_else(|| {
                    Error::InvalidParameter(
                        "local fingerprint provided but no local certificate".to_owned(),
                    )
                })?;
                fingerprint.verify(certificate.der())?;
            }
        }

        Ok(())
    }

    fn apply_description(
        &mut self,
        source: ContentSource,
        description: JsepTransportDescription,
        sdp_type: SdpType,
    ) -> Result<()> {
        self.validate_description(source, &description)?;

        let mut rtcp_mux_filter = self.rtcp_mux_filter.clone();
        match sdp_type {
            SdpType::Offer => rtcp_mux_filter.set_offer(description.rtcp_mux_enabled, source)?,
            SdpType::Pranswer => {
                rtcp_mux_filter.set_provisional_answer(description.rtcp_mux_enabled, source)?
            }
            SdpType::Answer => rtcp_mux_filter.set_answer(description.rtcp_mux_enabled, source)?,
            SdpType::Unspecified => {}
        }

        let dtls_parameters = if sdp_type.is_answer() {
            self.negotiate_dtls_parameters(source, &description, sdp_type)?
        } else {
            None
        };

        let ice_parameters = description.transport_desc.ice_parameters();
        let ice_restarting = source == ContentSource::Local
            && self.local_description.as_ref().is_some_and(|applied| {
                applied
                    .description
                    .transport_desc
                    .ice_parameters()
                    .credentials_changed(&ice_parameters)
            });

        // DTLS settings go first: they are the only ones the transports can
        // refuse, and they can be put back if SDES fails afterwards.
        let previous_dtls = dtls_parameters.as_ref().map(|_| self.dtls_snapshot());
        if let Some(params) = dtls_parameters {
            if let Err(err) = self.set_negotiated_dtls_parameters(params) {
                if let Some(previous) = previous_dtls {
                    self.restore_dtls(previous);
                }
                return Err(err);
            }
        }

        if self.srtp_mode == SrtpMode::Sdes {
            if let Err(err) = self.apply_sdes(source, &description, sdp_type) {
                if let Some(previous) = previous_dtls {
                    self.restore_dtls(previous);
                }
                return Err(err);
            }
        }

        // Nothing below fails on bad input.
        match source {
            ContentSource::Local => {
                self.rtp_dtls_transport
                    .ice_transport_mut()
                    .set_ice_parameters(&ice_parameters);
                if let Some(rtcp) = &mut self.rtcp_dtls_transport {
                    rtcp.ice_transport_mut().set_ice_parameters(&ice_parameters);
                }
            }
            ContentSource::Remote => {
                self.rtp_dtls_transport
                    .ice_transport_mut()
                    .set_remote_ice_parameters(&ice_parameters);
                if let Some(rtcp) = &mut self.rtcp_dtls_transport {
                    rtcp.ice_transport_mut()
                        .set_remote_ice_parameters(&ice_parameters);
                }
            }
        }
        if ice_restarting {
            self.needs_ice_restart = false;
        }

        self.rtcp_mux_filter = rtcp_mux_filter;
        let applied = Some(AppliedDescription {
            description,
            sdp_type,
        });
        match source {
            ContentSource::Local => self.local_description = applied,
            ContentSource::Remote => self.remote_description = applied,
        }

        if sdp_type == SdpType::Answer && self.rtcp_mux_filter.is_fully_active() {
            self.activate_rtcp_mux();
        }

        log::debug!("transport {}: applied {source} {sdp_type}", self.name);
        Ok(())
    }

    /// Works out the DTLS role and the peer fingerprint once both sides
    /// have advertised one. Returns None when DTLS is not in use.
    fn negotiate_dtls_parameters(
        &self,
        source: ContentSource,
        description: &JsepTransportDescription,
        sdp_type: SdpType,
    ) -> Result<Option<DtlsParameters>> {
        let (local, local_type, remote, remote_type) = match (source, self.offer_side(source)) {
            (ContentSource::Local, Some(remote)) => {
                (description, sdp_type, &remote.description, remote.sdp_type)
            }
            (ContentSource::Remote, Some(local)) => {
                (&local.description, local.sdp_type, description, sdp_type)
            }
            (_, None) => {
                return Err(Error::InvalidState(format!(
                    "{source} {sdp_type} without an offer"
                )))
            }
        };

        let local_fingerprint = local.transport_desc.identity_fingerprint.as_ref();
        let remote_fingerprint = remote.transport_desc.identity_fingerprint.as_ref();
        match (local_fingerprint, remote_fingerprint) {
            (Some(_), Some(remote_fingerprint)) => {
                let role = negotiate_role(
                    local.transport_desc.connection_role,
                    remote.transport_desc.connection_role,
                    local_type,
                    remote_type,
                    self.negotiated_dtls_role,
                )
                .map_err(|rejection| {
                    log::warn!(
                        "transport {}: DTLS role negotiation failed: {rejection}",
                        self.name
                    );
                    Error::RoleNegotiationFailed(rejection)
                })?;
                Ok(Some(DtlsParameters {
                    role,
                    remote_fingerprint: remote_fingerprint.clone(),
                }))
            }
            (Some(_), None) if source == ContentSource::Local => Err(Error::InvalidParameter(
                "local fingerprint supplied when caller didn't offer DTLS".to_owned(),
            )),
            _ => Ok(None),
        }
    }

    fn offer_side(&self, source: ContentSource) -> Option<&AppliedDescription> {
        match source {
            ContentSource::Local => self.remote_description.as_ref(),
            ContentSource::Remote => self.local_description.as_ref(),
        }
    }

    /// Runs the SDES exchange. The filter leaves its state alone on error;
    /// the header extension ids are put back here.
    fn apply_sdes(
        &mut self,
        source: ContentSource,
        description: &JsepTransportDescription,
        sdp_type: SdpType,
    ) -> Result<()> {
        let previous_ids = self
            .srtp_filter
            .encrypted_header_extension_ids(source)
            .to_vec();
        self.srtp_filter
            .set_encrypted_header_extension_ids(source, &description.encrypted_header_extension_ids);

        let result = match sdp_type {
            SdpType::Offer => self.srtp_filter.set_offer(&description.cryptos, source),
            SdpType::Pranswer => self
                .srtp_filter
                .set_provisional_answer(&description.cryptos, source),
            SdpType::Answer => self.srtp_filter.set_answer(&description.cryptos, source),
            SdpType::Unspecified => Ok(()),
        };

        if result.is_err() {
            self.srtp_filter
                .set_encrypted_header_extension_ids(source, &previous_ids);
        }
        result
    }

    fn set_negotiated_dtls_parameters(&mut self, params: DtlsParameters) -> Result<()> {
        self.rtp_dtls_transport.set_dtls_role(params.role)?;
        self.rtp_dtls_transport
            .set_remote_fingerprint(&params.remote_fingerprint)?;
        if let Some(rtcp) = &mut self.rtcp_dtls_transport {
            rtcp.set_dtls_role(params.role)?;
            rtcp.set_remote_fingerprint(&params.remote_fingerprint)?;
        }

        if self.negotiated_dtls_role.is_none() {
            log::debug!("transport {}: negotiated DTLS role {}", self.name, params.role);
        }
        self.negotiated_dtls_role = Some(params.role);
        Ok(())
    }

    fn dtls_snapshot(&self) -> DtlsSnapshot {
        DtlsSnapshot {
            negotiated_role: self.negotiated_dtls_role,
            rtp: DtlsSettings::of(&self.rtp_dtls_transport),
            rtcp: self.rtcp_dtls_transport.as_ref().map(DtlsSettings::of),
        }
    }

    /// Puts back the role and fingerprint each transport had before a
    /// description that failed half way.
    fn restore_dtls(&mut self, snapshot: DtlsSnapshot) {
        self.negotiated_dtls_role = snapshot.negotiated_role;
        snapshot.rtp.restore(&self.name, &mut self.rtp_dtls_transport);
        if let (Some(rtcp), Some(settings)) = (&mut self.rtcp_dtls_transport, snapshot.rtcp) {
            settings.restore(&self.name, rtcp);
        }
    }

    fn activate_rtcp_mux(&mut self) {
        if self.rtcp_dtls_transport.take().is_some() {
            log::debug!("transport {}: rtcp mux active, RTCP transport released", self.name);
        }
        if !self.rtcp_mux_signalled {
            self.rtcp_mux_signalled = true;
            if let Some(handler) = &mut self.on_rtcp_mux_active_handler {
                handler();
            }
        }
    }

    /// on_rtcp_mux_active sets a handler that is called the first time
    /// both sides agree to mux RTCP.
    pub fn on_rtcp_mux_active(&mut self, f: OnRtcpMuxActiveHdlrFn) {
        self.on_rtcp_mux_active_handler = Some(f);
    }

    /// Whether RTCP shares the RTP transport, at least provisionally.
    pub fn rtcp_mux_enabled(&self) -> bool {
        self.rtcp_mux_filter.is_active()
    }

    /// The role negotiated from the `setup:` attributes, if any.
    pub fn get_dtls_role(&self) -> Option<DtlsRole> {
        self.negotiated_dtls_role
    }

    pub fn set_needs_ice_restart(&mut self) {
        self.needs_ice_restart = true;
    }

    /// needs_ice_restart stays set until a local description with new ICE
    /// credentials is applied.
    pub fn needs_ice_restart(&self) -> bool {
        self.needs_ice_restart
    }

    pub fn verify_certificate_fingerprint(
        &self,
        certificate: Option<&RTCCertificate>,
        fingerprint: Option<&RTCDtlsFingerprint>,
    ) -> Result<()> {
        verify_certificate_fingerprint(certificate.map(|c| c.der()), fingerprint)
    }

    /// add_remote_candidates hands candidates to the ICE transport of their
    /// component. Either all candidates are added or none.
    pub fn add_remote_candidates(&mut self, candidates: Vec<RTCIceCandidate>) -> Result<()> {
        if self.local_description.is_none() || self.remote_description.is_none() {
            return Err(Error::InvalidState(format!(
                "transport {} is not ready to use remote candidates before both descriptions are set",
                self.name
            )));
        }

        for candidate in &candidates {
            let known = match candidate.component {
                ICE_CANDIDATE_COMPONENT_RTP => true,
                ICE_CANDIDATE_COMPONENT_RTCP => self.rtcp_dtls_transport.is_some(),
                _ => false,
            };
            if !known {
                return Err(Error::InvalidParameter(format!(
                    "candidate has an unknown component: {candidate}"
                )));
            }
        }

        for candidate in candidates {
            if candidate.component == ICE_CANDIDATE_COMPONENT_RTP {
                self.rtp_dtls_transport
                    .ice_transport_mut()
                    .add_remote_candidate(candidate)?;
            } else if let Some(rtcp) = &mut self.rtcp_dtls_transport {
                rtcp.ice_transport_mut().add_remote_candidate(candidate)?;
            }
        }
        Ok(())
    }

    /// get_stats reports one channel per live component.
    pub fn get_stats(&self) -> TransportStats {
        let mut channels = vec![channel_stats(&self.rtp_dtls_transport)];
        if let Some(rtcp) = &self.rtcp_dtls_transport {
            channels.push(channel_stats(rtcp));
        }
        TransportStats {
            transport_name: self.name.clone(),
            channel_stats: channels,
        }
    }

    /// start_srtp keys the SRTP filter from the finished DTLS handshake:
    /// it checks the peer certificate against the remote fingerprint and
    /// exports the keys for the negotiated profile ([RFC 5764] section 4.2).
    ///
    /// [RFC 5764]: https://tools.ietf.org/html/rfc5764#section-4.2
    pub fn start_srtp(&mut self) -> Result<()> {
        if self.srtp_mode != SrtpMode::DtlsSrtp {
            return Err(Error::InvalidState(format!(
                "transport {} keys SRTP with {}",
                self.name, self.srtp_mode
            )));
        }
        let role = self.negotiated_dtls_role.ok_or_else(|| {
            Error::InvalidState(format!("transport {}: no DTLS role negotiated", self.name))
        })?;

        let (send_profile, send_key, recv_key) =
            self.extract_srtp_keys(&self.rtp_dtls_transport, role)?;
        let rtcp_keys = match &self.rtcp_dtls_transport {
            Some(rtcp) if !self.rtcp_mux_filter.is_active() => {
                Some(self.extract_srtp_keys(rtcp, role)?)
            }
            _ => None,
        };

        if self.srtp_filter.is_active() {
            self.srtp_filter
                .update_rtp_params(send_profile, &send_key, send_profile, &recv_key)?;
        } else {
            self.srtp_filter
                .set_rtp_params(send_profile, &send_key, send_profile, &recv_key)?;
        }
        if let Some((profile, send_key, recv_key)) = rtcp_keys {
            if !self.srtp_filter.has_rtcp_sessions() {
                self.srtp_filter
                    .set_rtcp_params(profile, &send_key, profile, &recv_key)?;
            }
        }

        log::debug!("transport {}: SRTP started with {send_profile} as {role}", self.name);
        Ok(())
    }

    /// Returns the profile and the send and receive keys, each the master
    /// key followed by the master salt.
    fn extract_srtp_keys(
        &self,
        dtls_transport: &D,
        role: DtlsRole,
    ) -> Result<(ProtectionProfile, Vec<u8>, Vec<u8>)> {
        if !dtls_transport.state().is_connected() {
            return Err(Error::InvalidState(format!(
                "transport {}: DTLS is {}",
                self.name,
                dtls_transport.state()
            )));
        }

        if !self.settings.disable_certificate_fingerprint_verification {
            verify_certificate_fingerprint(
                dtls_transport.peer_certificate(),
                dtls_transport.remote_fingerprint(),
            )?;
        }

        let profile = dtls_transport.srtp_profile().ok_or_else(|| {
            Error::InvalidState(format!("transport {}: no SRTP profile negotiated", self.name))
        })?;
        if !self.settings.srtp_protection_profiles().contains(&profile) {
            return Err(Error::InvalidParameter(format!(
                "SRTP profile {profile} is not enabled"
            )));
        }

        let mut config = Config {
            profile,
            ..Default::default()
        };
        config.extract_session_keys_from_dtls(dtls_transport, role == DtlsRole::Client)?;

        let keys = config.keys;
        let send_key = [keys.local_master_key, keys.local_master_salt].concat();
        let recv_key = [keys.remote_master_key, keys.remote_master_salt].concat();
        Ok((profile, send_key, recv_key))
    }

    pub fn srtp_filter(&self) -> &SrtpFilter {
        &self.srtp_filter
    }

    /// The filter that protects and unprotects this transport's packets.
    pub fn srtp_filter_mut(&mut self) -> &mut SrtpFilter {
        &mut self.srtp_filter
    }

    pub fn is_srtp_active(&self) -> bool {
        self.srtp_filter.is_active()
    }

    pub fn rtp_dtls_transport(&self) -> &D {
        &self.rtp_dtls_transport
    }

    pub fn rtp_dtls_transport_mut(&mut self) -> &mut D {
        &mut self.rtp_dtls_transport
    }

    /// None once rtcp-mux has been negotiated.
    pub fn rtcp_dtls_transport(&self) -> Option<&D> {
        self.rtcp_dtls_transport.as_ref()
    }

    pub fn rtcp_dtls_transport_mut(&mut self) -> Option<&mut D> {
        self.rtcp_dtls_transport.as_mut()
    }
}

fn channel_stats<D: DtlsTransport>(dtls_transport: &D) -> TransportChannelStats {
    TransportChannelStats {
        component: dtls_transport.component(),
        dtls_state: dtls_transport.state().to_string(),
        dtls_role: dtls_transport.dtls_role().map(|role| role.to_string()),
        srtp_cipher: dtls_transport
            .srtp_profile()
            .map(|profile| profile.name().to_owned()),
        ice_transport_stats: dtls_transport.ice_transport().stats(),
    }
}
