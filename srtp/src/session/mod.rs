
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::*;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::header::rtcp_sender_ssrc;
use crate::option::*;
use crate::protection_profile::ProtectionProfile;

/// Default hard limit on packets protected or unprotected under one key.
pub const DEFAULT_KEY_HARD_LIMIT: u64 = 1 << 48;
/// Default soft limit, 2^16 packets before the hard one.
pub const DEFAULT_KEY_SOFT_LIMIT: u64 = DEFAULT_KEY_HARD_LIMIT - (1 << 16);

const AUTH_FAILURE_LOG_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Send,
    Recv,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Direction::Send => write!(f, "send"),
            Direction::Recv => write!(f, "recv"),
        }
    }
}

enum SessionState {
    Unconfigured,
    Configured {
        direction: Direction,
        context: Context,
    },
    Failed,
}

/// SrtpSession protects or unprotects the packets of one direction with a
/// single master key. It is configured exactly once with set_send or
/// set_recv and can be rekeyed afterwards with update_send/update_recv,
/// which keep rollover counters and replay windows.
///
/// A session is not thread safe; callers serialize access.
pub struct SrtpSession {
    state: SessionState,

    replay_window_size: usize,
    srtcp_replay_window_size: usize,
    srtp_replay_protection: bool,
    srtcp_replay_protection: bool,
    encrypted_header_extension_ids: Vec<u8>,
    external_auth_requested: bool,

    key_soft_limit: u64,
    key_hard_limit: u64,
    key_usage: u64,
    soft_limit_signalled: bool,
    hard_limit_reached: bool,

    rtp_packets_protected: u64,
    last_send_seq_num: Option<u16>,
    last_auth_failure_log: Option<Instant>,
    collided_ssrcs: HashSet<u32>,

    events: Arc<EventSink>,
    registration: Option<RegistrationGuard>,
}

impl Default for SrtpSession {
    fn default() -> Self {
        SrtpSession {
            state: SessionState::Unconfigured,
            replay_window_size: DEFAULT_REPLAY_WINDOW_SIZE,
            srtcp_replay_window_size: DEFAULT_REPLAY_WINDOW_SIZE,
            srtp_replay_protection: true,
            srtcp_replay_protection: true,
            encrypted_header_extension_ids: vec![],
            external_auth_requested: false,
            key_soft_limit: DEFAULT_KEY_SOFT_LIMIT,
            key_hard_limit: DEFAULT_KEY_HARD_LIMIT,
            key_usage: 0,
            soft_limit_signalled: false,
            hard_limit_reached: false,
            rtp_packets_protected: 0,
            last_send_seq_num: None,
            last_auth_failure_log: None,
            collided_ssrcs: HashSet::new(),
            events: Arc::new(EventSink::default()),
            registration: None,
        }
    }
}

impl fmt::Debug for SrtpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrtpSession")
            .field("direction", &self.direction())
            .field("profile", &self.profile())
            .field("rtp_packets_protected", &self.rtp_packets_protected)
            .finish()
    }
}

impl SrtpSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the session for outbound packets.
    pub fn set_send(&mut self, profile: ProtectionProfile, key: &[u8], salt: &[u8]) -> Result<()> {
        self.configure(Direction::Send, profile, key, salt)
    }

    /// Configures the session for inbound packets.
    pub fn set_recv(&mut self, profile: ProtectionProfile, key: &[u8], salt: &[u8]) -> Result<()> {
        self.configure(Direction::Recv, profile, key, salt)
    }

    /// Rekeys a send session.
    pub fn update_send(
        &mut self,
        profile: ProtectionProfile,
        key: &[u8],
        salt: &[u8],
    ) -> Result<()> {
        self.update(Direction::Send, profile, key, salt)
    }

    /// Rekeys a receive session.
    pub fn update_recv(
        &mut self,
        profile: ProtectionProfile,
        key: &[u8],
        salt: &[u8],
    ) -> Result<()> {
        self.update(Direction::Recv, profile, key, salt)
    }

    fn configure(
        &mut self,
        direction: Direction,
        profile: ProtectionProfile,
        key: &[u8],
        salt: &[u8],
    ) -> Result<()> {
        match self.state {
            SessionState::Unconfigured => {}
            SessionState::Configured { .. } => return Err(Error::ErrSessionAlreadyConfigured),
            SessionState::Failed => return Err(Error::ErrSessionFailed),
        }

        if self.registration.is_none() {
            self.registration = Some(register(&self.events)?);
        }

        // Senders skip replay checks so that retransmissions can be
        // protected again.
        let (srtp_opt, srtcp_opt) = match direction {
            Direction::Send => (None, None),
            Direction::Recv => (
                self.srtp_replay_protection
                    .then(|| srtp_replay_protection(self.replay_window_size)),
                self.srtcp_replay_protection
                    .then(|| srtcp_replay_protection(self.srtcp_replay_window_size)),
            ),
        };

        let mut context = Context::new(key, salt, profile, srtp_opt, srtcp_opt)?;

        if !self.encrypted_header_extension_ids.is_empty() {
            if profile.is_aead() {
                log::warn!(
                    "srtp: header extension encryption is not supported with {profile}, ignoring"
                );
            } else {
                context.set_encrypted_header_extension_ids(&self.encrypted_header_extension_ids);
            }
        }
        if self.external_auth_requested && !context.enable_external_auth() {
            log::debug!("srtp: external auth requested but not available for {profile}");
        }

        log::debug!("srtp: {direction} session configured with {profile}");
        self.state = SessionState::Configured { direction, context };
        Ok(())
    }

    fn update(
        &mut self,
        direction: Direction,
        profile: ProtectionProfile,
        key: &[u8],
        salt: &[u8],
    ) -> Result<()> {
        let context = self.context_mut(direction)?;
        if context.profile() != profile {
            return Err(Error::ErrCryptoSuiteChanged);
        }
        context.rekey(key, salt)?;

        self.key_usage = 0;
        self.soft_limit_signalled = false;
        self.hard_limit_reached = false;
        log::debug!("srtp: {direction} session rekeyed");
        Ok(())
    }

    fn context_mut(&mut self, direction: Direction) -> Result<&mut Context> {
        match &mut self.state {
            SessionState::Configured {
                direction: d,
                context,
            } if *d == direction => Ok(context),
            SessionState::Configured { .. } => Err(match direction {
                Direction::Send => Error::ErrNotSendSession,
                Direction::Recv => Error::ErrNotRecvSession,
            }),
            SessionState::Unconfigured => Err(Error::ErrSessionNotConfigured),
            SessionState::Failed => Err(Error::ErrSessionFailed),
        }
    }

    /// Protects the RTP packet in `buf[..in_len]` in place. `buf.len()` is
    /// the capacity available for the result. Returns the SRTP length and
    /// the extended index the packet was protected with.
    pub fn protect_rtp(&mut self, buf: &mut [u8], in_len: usize) -> Result<(usize, u64)> {
        if in_len > buf.len() {
            return Err(Error::BufferTooSmall(in_len, buf.len()));
        }
        self.check_key_limit()?;

        let result = self.context_mut(Direction::Send)?.encrypt_rtp(buf, in_len);
        let (n, index) = self.handle_result(result)?;

        self.rtp_packets_protected += 1;
        self.last_send_seq_num = Some((index & 0xFFFF) as u16);
        let ssrc = rtp_ssrc(buf);
        self.count_key_usage(ssrc);

        Ok((n, index))
    }

    /// Protects the RTCP packet in `buf[..in_len]` in place.
    pub fn protect_rtcp(&mut self, buf: &mut [u8], in_len: usize) -> Result<usize> {
        if in_len > buf.len() {
            return Err(Error::BufferTooSmall(in_len, buf.len()));
        }
        self.check_key_limit()?;

        let result = self.context_mut(Direction::Send)?.encrypt_rtcp(buf, in_len);
        if result == Err(Error::ErrKeyExpired) {
            let ssrc = rtcp_sender_ssrc(&buf[..in_len]).unwrap_or_default();
            self.events.emit(SrtpEvent {
                kind: SrtpEventKind::PacketIndexLimit,
                ssrc,
            });
        }
        let n = self.handle_result(result)?;

        let ssrc = rtcp_sender_ssrc(&buf[..n]).unwrap_or_default();
        self.count_key_usage(ssrc);
        Ok(n)
    }

    /// Verifies and decrypts the SRTP packet in `buf[..in_len]` in place,
    /// returning the RTP length.
    pub fn unprotect_rtp(&mut self, buf: &mut [u8], in_len: usize) -> Result<usize> {
        if in_len > buf.len() {
            return Err(Error::BufferTooSmall(in_len, buf.len()));
        }
        self.check_key_limit()?;

        let result = self
            .context_mut(Direction::Recv)?
            .decrypt_rtp(&mut buf[..in_len]);
        let n = self.handle_result(result)?;

        let ssrc = rtp_ssrc(buf);
        self.count_key_usage(ssrc);
        Ok(n)
    }

    /// Verifies and decrypts the SRTCP packet in `buf[..in_len]` in place,
    /// returning the RTCP length.
    pub fn unprotect_rtcp(&mut self, buf: &mut [u8], in_len: usize) -> Result<usize> {
        if in_len > buf.len() {
            return Err(Error::BufferTooSmall(in_len, buf.len()));
        }
        self.check_key_limit()?;

        let result = self
            .context_mut(Direction::Recv)?
            .decrypt_rtcp(&mut buf[..in_len]);
        let n = self.handle_result(result)?;

        let ssrc = rtcp_sender_ssrc(&buf[..n]).unwrap_or_default();
        self.count_key_usage(ssrc);
        Ok(n)
    }

    /// Reports an SSRC seen on inbound RTP. A send session that already
    /// protected RTP under the same SSRC treats it as a collision and raises
    /// SsrcCollision, once per SSRC.
    pub fn check_inbound_ssrc(&mut self, ssrc: u32) -> bool {
        let collides = match &self.state {
            SessionState::Configured {
                direction: Direction::Send,
                context,
            } => context.last_sequence_number(ssrc).is_some(),
            _ => false,
        };
        if collides && self.collided_ssrcs.insert(ssrc) {
            self.events.emit(SrtpEvent {
                kind: SrtpEventKind::SsrcCollision,
                ssrc,
            });
        }
        collides
    }

    fn handle_result<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Ok(v) => Ok(v),
            Err(Error::InternalCrypto(e)) => {
                log::error!("srtp: internal crypto error, session disabled: {e}");
                self.state = SessionState::Failed;
                Err(Error::InternalCrypto(e))
            }
            Err(err) if err.is_auth_failure() => {
                let now = Instant::now();
                let quiet = self
                    .last_auth_failure_log
                    .is_some_and(|last| now.duration_since(last) < AUTH_FAILURE_LOG_INTERVAL);
                if !quiet {
                    log::warn!("srtp: {err}");
                    self.last_auth_failure_log = Some(now);
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn check_key_limit(&self) -> Result<()> {
        if self.hard_limit_reached {
            Err(Error::ErrKeyExpired)
        } else {
            Ok(())
        }
    }

    fn count_key_usage(&mut self, ssrc: u32) {
        self.key_usage += 1;
        if self.key_usage >= self.key_hard_limit {
            self.hard_limit_reached = true;
            self.events.emit(SrtpEvent {
                kind: SrtpEventKind::KeyHardLimit,
                ssrc,
            });
        } else if self.key_usage >= self.key_soft_limit && !self.soft_limit_signalled {
            self.soft_limit_signalled = true;
            self.events.emit(SrtpEvent {
                kind: SrtpEventKind::KeySoftLimit,
                ssrc,
            });
        }
    }

    /// Returns the RTP authentication key, its length and the tag length
    /// when external authentication is active.
    pub fn get_rtp_auth_params(&self) -> Result<(&[u8], usize, usize)> {
        match &self.state {
            SessionState::Configured { context, .. } if context.is_external_auth_active() => {
                let key = context.rtp_auth_key().ok_or(Error::ErrExternalAuthNotActive)?;
                Ok((key, key.len(), context.rtp_auth_tag_len()))
            }
            _ => Err(Error::ErrExternalAuthNotActive),
        }
    }

    /// The largest number of bytes protect_rtp may add to a packet.
    pub fn get_srtp_overhead(&self) -> usize {
        self.profile().map(|p| p.rtp_overhead()).unwrap_or(0)
    }

    /// Sets the replay window for both SRTP and SRTCP. Must be called before
    /// the session is configured.
    pub fn set_replay_window_size(&mut self, window_size: usize) -> Result<()> {
        self.check_window_size(window_size)?;
        self.replay_window_size = window_size;
        self.srtcp_replay_window_size = window_size;
        Ok(())
    }

    /// Overrides the SRTCP replay window only.
    pub fn set_srtcp_replay_window_size(&mut self, window_size: usize) -> Result<()> {
        self.check_window_size(window_size)?;
        self.srtcp_replay_window_size = window_size;
        Ok(())
    }

    fn check_window_size(&self, window_size: usize) -> Result<()> {
        if !matches!(self.state, SessionState::Unconfigured) {
            return Err(Error::ErrSessionAlreadyConfigured);
        }
        if !(MIN_REPLAY_WINDOW_SIZE..=MAX_REPLAY_WINDOW_SIZE).contains(&window_size) {
            return Err(Error::ErrReplayWindowSize(window_size));
        }
        Ok(())
    }

    pub fn replay_window_size(&self) -> usize {
        self.replay_window_size
    }

    pub fn srtcp_replay_window_size(&self) -> usize {
        self.srtcp_replay_window_size
    }

    pub fn disable_srtp_replay_protection(&mut self) -> Result<()> {
        if !matches!(self.state, SessionState::Unconfigured) {
            return Err(Error::ErrSessionAlreadyConfigured);
        }
        self.srtp_replay_protection = false;
        Ok(())
    }

    pub fn disable_srtcp_replay_protection(&mut self) -> Result<()> {
        if !matches!(self.state, SessionState::Unconfigured) {
            return Err(Error::ErrSessionAlreadyConfigured);
        }
        self.srtcp_replay_protection = false;
        Ok(())
    }

    /// Header extension ids to encrypt (RFC 6904). Takes effect immediately
    /// on a configured session.
    pub fn set_encrypted_header_extension_ids(&mut self, ids: &[u8]) {
        self.encrypted_header_extension_ids = ids.to_vec();
        if let SessionState::Configured { context, .. } = &mut self.state {
            if !context.profile().is_aead() {
                context.set_encrypted_header_extension_ids(ids);
            }
        }
    }

    /// Requests external authentication; only valid before configuration.
    pub fn enable_external_auth(&mut self) -> Result<()> {
        if !matches!(self.state, SessionState::Unconfigured) {
            return Err(Error::ErrSessionAlreadyConfigured);
        }
        self.external_auth_requested = true;
        Ok(())
    }

    pub fn is_external_auth_enabled(&self) -> bool {
        self.external_auth_requested
    }

    pub fn is_external_auth_active(&self) -> bool {
        match &self.state {
            SessionState::Configured { context, .. } => context.is_external_auth_active(),
            _ => false,
        }
    }

    /// Overrides the key usage limits. `soft` is clamped to `hard`.
    pub fn set_key_limit(&mut self, soft: u64, hard: u64) {
        self.key_hard_limit = hard;
        self.key_soft_limit = soft.min(hard);
    }

    pub fn on_event(&mut self, handler: EventHandler) {
        self.events.set_handler(Some(handler));
    }

    /// Handle under which backend events reach this session.
    pub fn registration_handle(&self) -> Option<u64> {
        self.registration.as_ref().map(|r| r.handle())
    }

    pub fn last_send_seq_num(&self) -> Option<u16> {
        self.last_send_seq_num
    }

    pub fn rtp_packets_protected(&self) -> u64 {
        self.rtp_packets_protected
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, SessionState::Configured { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, SessionState::Failed)
    }

    pub fn direction(&self) -> Option<Direction> {
        match &self.state {
            SessionState::Configured { direction, .. } => Some(*direction),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<ProtectionProfile> {
        match &self.state {
            SessionState::Configured { context, .. } => Some(context.profile()),
            _ => None,
        }
    }
}

fn rtp_ssrc(buf: &[u8]) -> u32 {
    if buf.len() < 12 {
        return 0;
    }
    u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]])
}
