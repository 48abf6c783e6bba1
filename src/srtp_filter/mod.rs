
pub mod srtp_stat;

use std::fmt;

use srtp::{ProtectionProfile, SrtpSession};
use srtp_stat::{OnSrtpErrorHdlrFn, SrtpStat};

use crate::api::setting_engine::SettingEngine;
use crate::error::{Error, Result};
use crate::sdp::crypto_params::CryptoParams;
use crate::sdp::transport_description::ContentSource;

/// FilterState is where a SrtpFilter stands in the offer/answer exchange.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterState {
    #[default]
    Init,
    SentOffer,
    ReceivedOffer,
    SentProvisionalAnswerNoCrypto,
    ReceivedProvisionalAnswerNoCrypto,
    Active,
    /// Re-offer while the previous keys stay in use.
    SentUpdatedOffer,
    ReceivedUpdatedOffer,
    /// Keys from a provisional answer are in use.
    SentProvisionalAnswer,
    ReceivedProvisionalAnswer,
}

impl FilterState {
    /// Whether keys are installed and packets may flow.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            FilterState::Active
                | FilterState::SentUpdatedOffer
                | FilterState::ReceivedUpdatedOffer
                | FilterState::SentProvisionalAnswer
                | FilterState::ReceivedProvisionalAnswer
        )
    }

    fn expect_offer(&self, source: ContentSource) -> bool {
        use ContentSource::*;
        use FilterState::*;

        matches!(
            (self, source),
            (Init, _)
                | (Active, _)
                | (SentOffer, Local)
                | (SentUpdatedOffer, Local)
                | (ReceivedOffer, Remote)
                | (ReceivedUpdatedOffer, Remote)
        )
    }

    fn expect_answer(&self, source: ContentSource) -> bool {
        use ContentSource::*;
        use FilterState::*;

        matches!(
            (self, source),
            (SentOffer, Remote)
                | (ReceivedOffer, Local)
                | (SentUpdatedOffer, Remote)
                | (ReceivedUpdatedOffer, Local)
                | (SentProvisionalAnswerNoCrypto, Local)
                | (SentProvisionalAnswer, Local)
                | (ReceivedProvisionalAnswerNoCrypto, Remote)
                | (ReceivedProvisionalAnswer, Remote)
        )
    }
}

/// A send session and a receive session, always keyed together.
struct SessionPair {
    send: SrtpSession,
    recv: SrtpSession,
}

/// Everything a keyed filter owns. A new set is built completely before it
/// replaces the old one, so a failed rekey leaves the old keys in place.
struct SessionSet {
    rtp: SessionPair,
    /// Separate RTCP keys, for DTLS-SRTP without rtcp-mux.
    rtcp: Option<SessionPair>,
    /// The SDES lines the RTP pair was keyed from.
    applied_params: Option<(CryptoParams, CryptoParams)>,
}

/// SrtpFilter negotiates SRTP keys through offer/answer (SDES) or takes them
/// from DTLS-SRTP, and then protects and unprotects packets with them.
pub struct SrtpFilter {
    state: FilterState,
    offer_params: Vec<CryptoParams>,
    sessions: Option<SessionSet>,
    send_encrypted_header_extension_ids: Vec<u8>,
    recv_encrypted_header_extension_ids: Vec<u8>,
    external_auth_enabled: bool,
    settings: SettingEngine,
    srtp_stat: SrtpStat,
}

impl Default for SrtpFilter {
    fn default() -> Self {
        SrtpFilter::new(&SettingEngine::default())
    }
}

impl fmt::Debug for SrtpFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrtpFilter")
            .field("state", &self.state)
            .field("offer_params", &self.offer_params)
            .field("keyed", &self.sessions.is_some())
            .field("external_auth_enabled", &self.external_auth_enabled)
            .finish()
    }
}

fn split_master(profile: ProtectionProfile, master: &[u8]) -> Result<(&[u8], &[u8])> {
    if master.len() != profile.master_len() {
        return Err(Error::InvalidCryptoParams(format!(
            "{} needs {} bytes of key and salt, got {}",
            profile,
            profile.master_len(),
            master.len()
        )));
    }
    Ok(master.split_at(profile.key_len()))
}

fn rtp_ssrc(buf: &[u8]) -> u32 {
    if buf.len() < 12 {
        return 0;
    }
    u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]])
}

impl SrtpFilter {
    pub fn new(settings: &SettingEngine) -> Self {
        SrtpFilter {
            state: FilterState::Init,
            offer_params: vec![],
            sessions: None,
            send_encrypted_header_extension_ids: vec![],
            recv_encrypted_header_extension_ids: vec![],
            external_auth_enabled: false,
            settings: settings.clone(),
            srtp_stat: SrtpStat::new(settings.srtp_error_silent_time),
        }
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// The offered lines waiting for an answer.
    pub fn offer_params(&self) -> &[CryptoParams] {
        &self.offer_params
    }

    /// set_offer stores the crypto lines of an offer from `source`.
    pub fn set_offer(&mut self, offer_params: &[CryptoParams], source: ContentSource) -> Result<()> {
        if !self.state.expect_offer(source) {
            log::warn!("wrong state {:?} to update SRTP offer", self.state);
            return Err(Error::InvalidState(format!(
                "SRTP filter in state {:?} does not expect a {source} offer",
                self.state
            )));
        }

        self.offer_params = offer_params.to_vec();
        self.state = match (self.state, source) {
            (FilterState::Init, ContentSource::Local) => FilterState::SentOffer,
            (FilterState::Init, ContentSource::Remote) => FilterState::ReceivedOffer,
            (FilterState::Active, ContentSource::Local) => FilterState::SentUpdatedOffer,
            (FilterState::Active, ContentSource::Remote) => FilterState::ReceivedUpdatedOffer,
            (state, _) => state,
        };
        Ok(())
    }

    pub fn set_answer(&mut self, answer_params: &[CryptoParams], source: ContentSource) -> Result<()> {
        self.do_set_answer(answer_params, source, true)
    }

    pub fn set_provisional_answer(
        &mut self,
        answer_params: &[CryptoParams],
        source: ContentSource,
    ) -> Result<()> {
        self.do_set_answer(answer_params, source, false)
    }

    fn do_set_answer(
        &mut self,
        answer_params: &[CryptoParams],
        source: ContentSource,
        is_final: bool,
    ) -> Result<()> {
        if !self.state.expect_answer(source) {
            log::warn!("invalid state {:?} for SRTP answer", self.state);
            return Err(Error::InvalidState(format!(
                "SRTP filter in state {:?} does not expect a {source} answer",
                self.state
            )));
        }

        // An answer without crypto completes an unencrypted session.
        if answer_params.is_empty() {
            if is_final {
                self.reset();
            } else {
                self.state = match source {
                    ContentSource::Local => FilterState::SentProvisionalAnswerNoCrypto,
                    ContentSource::Remote => FilterState::ReceivedProvisionalAnswerNoCrypto,
                };
            }
            return Ok(());
        }

        let selected = self.negotiate_params(answer_params)?;
        let (send_params, recv_params) = match source {
            ContentSource::Remote => (&selected, &answer_params[0]),
            ContentSource::Local => (&answer_params[0], &selected),
        };
        self.apply_params(send_params, recv_params)?;

        if is_final {
            self.offer_params.clear();
            self.state = FilterState::Active;
        } else {
            self.state = match source {
                ContentSource::Local => FilterState::SentProvisionalAnswer,
                ContentSource::Remote => FilterState::ReceivedProvisionalAnswer,
            };
        }
        Ok(())
    }

    /// Picks the first offered line the single answered line matches.
    fn negotiate_params(&self, answer_params: &[CryptoParams]) -> Result<CryptoParams> {
        if answer_params.len() != 1 || self.offer_params.is_empty() {
            log::warn!("invalid parameters in SRTP answer");
            return Err(Error::InvalidCryptoParams(format!(
                "answer must carry exactly one crypto line, got {} against {} offered",
                answer_params.len(),
                self.offer_params.len()
            )));
        }

        let answer = &answer_params[0];
        match self.offer_params.iter().find(|offered| answer.matches(offered)) {
            Some(selected) => Ok(selected.clone()),
            None => {
                log::warn!("no offered crypto params match the answer {answer}");
                Err(Error::ErrCryptoMismatch)
            }
        }
    }

    fn apply_params(&mut self, send_params: &CryptoParams, recv_params: &CryptoParams) -> Result<()> {
        if let Some(SessionSet {
            applied_params: Some((applied_send, applied_recv)),
            ..
        }) = &self.sessions
        {
            if applied_send.cipher_suite == send_params.cipher_suite
                && applied_send.key_params == send_params.key_params
                && applied_recv.cipher_suite == recv_params.cipher_suite
                && applied_recv.key_params == recv_params.key_params
            {
                // Rekeying with the same keys would reset the rollover counters.
                log::debug!("applying the same SRTP parameters again, no-op");
                return Ok(());
            }
        }

        let (send_profile, send_key, send_salt) = send_params.decode_key_params()?;
        let (recv_profile, recv_key, recv_salt) = recv_params.decode_key_params()?;

        let mut rtp = self.create_srtp_sessions()?;
        rtp.send.set_send(send_profile, &send_key, &send_salt)?;
        rtp.recv.set_recv(recv_profile, &recv_key, &recv_salt)?;

        log::debug!(
            "SRTP activated with negotiated parameters: send cipher_suite {} recv cipher_suite {}",
            send_params.cipher_suite,
            recv_params.cipher_suite
        );
        self.sessions = Some(SessionSet {
            rtp,
            rtcp: None,
            applied_params: Some((send_params.clone(), recv_params.clone())),
        });
        Ok(())
    }

    fn create_srtp_sessions(&self) -> Result<SessionPair> {
        let mut send = self.settings.new_srtp_session()?;
        let mut recv = self.settings.new_srtp_session()?;
        if self.external_auth_enabled {
            send.enable_external_auth()?;
        }
        send.set_encrypted_header_extension_ids(&self.send_encrypted_header_extension_ids);
        recv.set_encrypted_header_extension_ids(&self.recv_encrypted_header_extension_ids);
        Ok(SessionPair { send, recv })
    }

    /// set_rtp_params keys the filter from DTLS-SRTP. Each key is the
    /// master key followed by the master salt.
    pub fn set_rtp_params(
        &mut self,
        send_profile: ProtectionProfile,
        send_key: &[u8],
        recv_profile: ProtectionProfile,
        recv_key: &[u8],
    ) -> Result<()> {
        if self.is_active() {
            log::warn!("tried to set SRTP params when filter already active");
            return Err(Error::InvalidState("SRTP filter already active".to_owned()));
        }

        let (send_master, send_salt) = split_master(send_profile, send_key)?;
        let (recv_master, recv_salt) = split_master(recv_profile, recv_key)?;

        let mut rtp = self.create_srtp_sessions()?;
        rtp.send.set_send(send_profile, send_master, send_salt)?;
        rtp.recv.set_recv(recv_profile, recv_master, recv_salt)?;

        self.sessions = Some(SessionSet {
            rtp,
            rtcp: None,
            applied_params: None,
        });
        self.state = FilterState::Active;

        log::debug!(
            "SRTP activated with negotiated parameters: send cipher_suite {send_profile} recv cipher_suite {recv_profile}"
        );
        Ok(())
    }

    /// update_rtp_params rekeys an active filter without resetting replay
    /// state. The suites must stay the same.
    pub fn update_rtp_params(
        &mut self,
        send_profile: ProtectionProfile,
        send_key: &[u8],
        recv_profile: ProtectionProfile,
        recv_key: &[u8],
    ) -> Result<()> {
        if !self.is_active() {
            log::warn!("tried to update SRTP params when filter is not active");
            return Err(Error::InvalidState("SRTP filter not active".to_owned()));
        }

        let (send_master, send_salt) = split_master(send_profile, send_key)?;
        let (recv_master, recv_salt) = split_master(recv_profile, recv_key)?;

        let sessions = self
            .sessions
            .as_mut()
            .ok_or_else(|| Error::InvalidState("SRTP filter has no sessions".to_owned()))?;
        let rtp = &mut sessions.rtp;
        // Both checked up front so that neither direction is rekeyed alone.
        if rtp.send.profile() != Some(send_profile) || rtp.recv.profile() != Some(recv_profile) {
            return Err(srtp::Error::ErrCryptoSuiteChanged.into());
        }

        rtp.send
            .set_encrypted_header_extension_ids(&self.send_encrypted_header_extension_ids);
        rtp.send.update_send(send_profile, send_master, send_salt)?;
        rtp.recv
            .set_encrypted_header_extension_ids(&self.recv_encrypted_header_extension_ids);
        rtp.recv.update_recv(recv_profile, recv_master, recv_salt)?;
        sessions.applied_params = None;

        log::debug!(
            "SRTP updated with negotiated parameters: send cipher_suite {send_profile} recv cipher_suite {recv_profile}"
        );
        Ok(())
    }

    /// set_rtcp_params keys separate RTCP sessions, for DTLS-SRTP where RTP
    /// and RTCP run over different handshakes. It can be called once, after
    /// the RTP sessions exist.
    pub fn set_rtcp_params(
        &mut self,
        send_profile: ProtectionProfile,
        send_key: &[u8],
        recv_profile: ProtectionProfile,
        recv_key: &[u8],
    ) -> Result<()> {
        let sessions = match self.sessions.as_mut() {
            Some(sessions) if sessions.rtcp.is_none() => sessions,
            Some(_) => {
                log::warn!("tried to set SRTCP params when filter already active");
                return Err(Error::InvalidState(
                    "SRTCP sessions already configured".to_owned(),
                ));
            }
            None => {
                return Err(Error::InvalidState(
                    "SRTCP params need the SRTP sessions first".to_owned(),
                ))
            }
        };

        let (send_master, send_salt) = split_master(send_profile, send_key)?;
        let (recv_master, recv_salt) = split_master(recv_profile, recv_key)?;

        let mut send = self.settings.new_srtp_session()?;
        send.set_send(send_profile, send_master, send_salt)?;
        let mut recv = self.settings.new_srtp_session()?;
        recv.set_recv(recv_profile, recv_master, recv_salt)?;
        sessions.rtcp = Some(SessionPair { send, recv });

        log::debug!(
            "SRTCP activated with negotiated parameters: send cipher_suite {send_profile} recv cipher_suite {recv_profile}"
        );
        Ok(())
    }

    fn active_sessions(&mut self, op: &str) -> Result<&mut SessionSet> {
        if !self.state.is_active() {
            log::warn!("failed to {op}: SRTP not active");
            return Err(Error::InvalidState(format!("failed to {op}: SRTP not active")));
        }
        self.sessions
            .as_mut()
            .ok_or_else(|| Error::InvalidState(format!("failed to {op}: no SRTP sessions")))
    }

    /// protect_rtp encrypts `buf[..in_len]` in place; `buf.len()` is the
    /// room available for the tag. Returns the SRTP length and the packet
    /// index.
    pub fn protect_rtp(&mut self, buf: &mut [u8], in_len: usize) -> Result<(usize, u64)> {
        let ssrc = rtp_ssrc(buf);
        let session = &mut self.active_sessions("protect rtp")?.rtp.send;
        let result = session.protect_rtp(buf, in_len);
        self.srtp_stat.add_protect_rtp_result(ssrc, &result);
        Ok(result?)
    }

    pub fn protect_rtcp(&mut self, buf: &mut [u8], in_len: usize) -> Result<usize> {
        let sessions = self.active_sessions("protect rtcp")?;
        let session = match sessions.rtcp.as_mut() {
            Some(rtcp) => &mut rtcp.send,
            None => &mut sessions.rtp.send,
        };
        let result = session.protect_rtcp(buf, in_len);
        self.srtp_stat.add_protect_rtcp_result(&result);
        Ok(result?)
    }

    pub fn unprotect_rtp(&mut self, buf: &mut [u8], in_len: usize) -> Result<usize> {
        let ssrc = rtp_ssrc(buf);
        let sessions = self.active_sessions("unprotect rtp")?;
        let result = sessions.rtp.recv.unprotect_rtp(buf, in_len);
        if result.is_ok() {
            sessions.rtp.send.check_inbound_ssrc(ssrc);
        }
        self.srtp_stat.add_unprotect_rtp_result(ssrc, &result);
        Ok(result?)
    }

    pub fn unprotect_rtcp(&mut self, buf: &mut [u8], in_len: usize) -> Result<usize> {
        let sessions = self.active_sessions("unprotect rtcp")?;
        let session = match sessions.rtcp.as_mut() {
            Some(rtcp) => &mut rtcp.recv,
            None => &mut sessions.rtp.recv,
        };
        let result = session.unprotect_rtcp(buf, in_len);
        self.srtp_stat.add_unprotect_rtcp_result(&result);
        Ok(result?)
    }

    /// Returns the send session's RTP auth key, key length and tag length
    /// while external authentication is active.
    pub fn get_rtp_auth_params(&mut self) -> Result<(&[u8], usize, usize)> {
        let sessions = self.active_sessions("get rtp auth params")?;
        Ok(sessions.rtp.send.get_rtp_auth_params()?)
    }

    pub fn get_srtp_overhead(&mut self) -> Result<usize> {
        let sessions = self.active_sessions("get srtp overhead")?;
        Ok(sessions.rtp.send.get_srtp_overhead())
    }

    /// enable_external_auth must be called before the filter is keyed.
    pub fn enable_external_auth(&mut self) -> Result<()> {
        if self.is_active() {
            return Err(Error::InvalidState(
                "external auth must be enabled before SRTP is active".to_owned(),
            ));
        }
        self.external_auth_enabled = true;
        Ok(())
    }

    pub fn is_external_auth_enabled(&self) -> bool {
        self.external_auth_enabled
    }

    pub fn is_external_auth_active(&self) -> bool {
        match &self.sessions {
            Some(sessions) if self.is_active() => sessions.rtp.send.is_external_auth_active(),
            _ => false,
        }
    }

    /// Ids the local side declared are the ones it receives encrypted; ids
    /// the remote side declared are the ones it must encrypt when sending.
    pub fn set_encrypted_header_extension_ids(&mut self, source: ContentSource, ids: &[u8]) {
        match source {
            ContentSource::Local => {
                self.recv_encrypted_header_extension_ids = ids.to_vec();
                if let Some(sessions) = &mut self.sessions {
                    sessions.rtp.recv.set_encrypted_header_extension_ids(ids);
                }
            }
            ContentSource::Remote => {
                self.send_encrypted_header_extension_ids = ids.to_vec();
                if let Some(sessions) = &mut self.sessions {
                    sessions.rtp.send.set_encrypted_header_extension_ids(ids);
                }
            }
        }
    }

    pub fn encrypted_header_extension_ids(&self, source: ContentSource) -> &[u8] {
        match source {
            ContentSource::Local => &self.recv_encrypted_header_extension_ids,
            ContentSource::Remote => &self.send_encrypted_header_extension_ids,
        }
    }

    /// reset drops all keys and returns to the initial state.
    pub fn reset(&mut self) {
        self.offer_params.clear();
        self.state = FilterState::Init;
        self.sessions = None;
        log::debug!("SRTP reset to init state");
    }

    pub fn on_srtp_error(&mut self, handler: OnSrtpErrorHdlrFn) {
        self.srtp_stat.on_srtp_error(handler);
    }

    pub fn srtp_stat_mut(&mut self) -> &mut SrtpStat {
        &mut self.srtp_stat
    }

    /// Number of RTP packets protected under the current send keys.
    pub fn rtp_packets_protected(&self) -> u64 {
        self.sessions
            .as_ref()
            .map(|s| s.rtp.send.rtp_packets_protected())
            .unwrap_or(0)
    }

    pub fn has_rtcp_sessions(&self) -> bool {
        self.sessions.as_ref().is_some_and(|s| s.rtcp.is_some())
    }

    /// The (send, recv) suites of the RTP sessions.
    pub fn profiles(&self) -> Option<(ProtectionProfile, ProtectionProfile)> {
        let sessions = self.sessions.as_ref()?;
        Some((sessions.rtp.send.profile()?, sessions.rtp.recv.profile()?))
    }
}
