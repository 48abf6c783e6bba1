#[cfg(test)]
mod setting_engine_test;

use std::time::Duration;

use srtp::option::{DEFAULT_REPLAY_WINDOW_SIZE, MAX_REPLAY_WINDOW_SIZE, MIN_REPLAY_WINDOW_SIZE};
use srtp::session::{DEFAULT_KEY_HARD_LIMIT, DEFAULT_KEY_SOFT_LIMIT};
use srtp::{ProtectionProfile, SrtpSession};

use crate::error::{Error, Result};

/// How long an SRTP error for one (ssrc, mode, error) key stays silent after
/// it was signalled.
pub const DEFAULT_SRTP_ERROR_SILENT_TIME: Duration = Duration::from_millis(1000);

/// Replay window sizes; 0 means the default of 1024 packets.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ReplayProtection {
    pub srtp: usize,
    pub srtcp: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLimits {
    pub soft: u64,
    pub hard: u64,
}

impl Default for KeyLimits {
    fn default() -> Self {
        KeyLimits {
            soft: DEFAULT_KEY_SOFT_LIMIT,
            hard: DEFAULT_KEY_HARD_LIMIT,
        }
    }
}

/// SettingEngine allows influencing behavior in ways that are not
/// negotiated in SDP: replay windows, key limits, accepted DTLS-SRTP
/// profiles and the like.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingEngine {
    pub(crate) replay_protection: ReplayProtection,
    pub(crate) disable_srtp_replay_protection: bool,
    pub(crate) disable_srtcp_replay_protection: bool,
    pub(crate) disable_certificate_fingerprint_verification: bool,
    pub(crate) srtp_protection_profiles: Vec<ProtectionProfile>,
    pub(crate) key_limits: KeyLimits,
    pub(crate) srtp_error_silent_time: Duration,
}

impl Default for SettingEngine {
    fn default() -> Self {
        SettingEngine {
            replay_protection: ReplayProtection::default(),
            disable_srtp_replay_protection: false,
            disable_srtcp_replay_protection: false,
            disable_certificate_fingerprint_verification: false,
            srtp_protection_profiles: vec![],
            key_limits: KeyLimits::default(),
            srtp_error_silent_time: DEFAULT_SRTP_ERROR_SILENT_TIME,
        }
    }
}

fn check_replay_window(n: usize) -> Result<()> {
    if n != 0 && !(MIN_REPLAY_WINDOW_SIZE..=MAX_REPLAY_WINDOW_SIZE).contains(&n) {
        return Err(Error::ErrReplayWindowSize(
            MIN_REPLAY_WINDOW_SIZE,
            MAX_REPLAY_WINDOW_SIZE,
        ));
    }
    Ok(())
}

impl SettingEngine {
    /// set_srtp_replay_protection_window sets a replay attack protection window size of srtp session.
    pub fn set_srtp_replay_protection_window(&mut self, n: usize) -> Result<()> {
        check_replay_window(n)?;
        self.disable_srtp_replay_protection = false;
        self.replay_protection.srtp = n;
        Ok(())
    }

    /// set_srtcp_replay_protection_window sets a replay attack protection window size of srtcp session.
    pub fn set_srtcp_replay_protection_window(&mut self, n: usize) -> Result<()> {
        check_replay_window(n)?;
        self.disable_srtcp_replay_protection = false;
        self.replay_protection.srtcp = n;
        Ok(())
    }

    /// disable_srtp_replay_protection disables srtp replay protection.
    pub fn disable_srtp_replay_protection(&mut self, is_disabled: bool) {
        self.disable_srtp_replay_protection = is_disabled;
    }

    /// disable_srtcp_replay_protection disables srtcp replay protection.
    pub fn disable_srtcp_replay_protection(&mut self, is_disabled: bool) {
        self.disable_srtcp_replay_protection = is_disabled;
    }

    /// disable_certificate_fingerprint_verification skips matching the peer
    /// certificate against the remote fingerprint once the DTLS handshake
    /// has finished.
    pub fn disable_certificate_fingerprint_verification(&mut self, is_disabled: bool) {
        self.disable_certificate_fingerprint_verification = is_disabled;
    }

    /// set_srtp_protection_profiles overrides the DTLS-SRTP profiles a
    /// transport accepts. An empty list restores the defaults.
    pub fn set_srtp_protection_profiles(&mut self, profiles: Vec<ProtectionProfile>) {
        self.srtp_protection_profiles = profiles;
    }

    /// set_srtp_key_limits overrides when sessions raise the soft and hard
    /// key usage events.
    pub fn set_srtp_key_limits(&mut self, soft: u64, hard: u64) {
        self.key_limits = KeyLimits {
            soft: soft.min(hard),
            hard,
        };
    }

    /// set_srtp_error_silent_time sets how long a repeated SRTP error stays
    /// unreported after being signalled once.
    pub fn set_srtp_error_silent_time(&mut self, silent_time: Duration) {
        self.srtp_error_silent_time = silent_time;
    }

    pub(crate) fn srtp_protection_profiles(&self) -> Vec<ProtectionProfile> {
        if self.srtp_protection_profiles.is_empty() {
            vec![
                ProtectionProfile::AeadAes128Gcm,
                ProtectionProfile::AeadAes256Gcm,
                ProtectionProfile::Aes128CmHmacSha1_80,
                ProtectionProfile::Aes128CmHmacSha1_32,
            ]
        } else {
            self.srtp_protection_profiles.clone()
        }
    }

    pub(crate) fn srtp_replay_window(&self) -> usize {
        if self.replay_protection.srtp == 0 {
            DEFAULT_REPLAY_WINDOW_SIZE
        } else {
            self.replay_protection.srtp
        }
    }

    pub(crate) fn srtcp_replay_window(&self) -> usize {
        if self.replay_protection.srtcp == 0 {
            DEFAULT_REPLAY_WINDOW_SIZE
        } else {
            self.replay_protection.srtcp
        }
    }

    /// new_srtp_session creates an unconfigured session carrying these
    /// settings.
    pub(crate) fn new_srtp_session(&self) -> Result<SrtpSession> {
        let mut session = SrtpSession::new();
        session.set_replay_window_size(self.srtp_replay_window())?;
        session.set_srtcp_replay_window_size(self.srtcp_replay_window())?;
        if self.disable_srtp_replay_protection {
            session.disable_srtp_replay_protection()?;
        }
        if self.disable_srtcp_replay_protection {
            session.disable_srtcp_replay_protection()?;
        }
        session.set_key_limit(self.key_limits.soft, self.key_limits.hard);
        Ok(session)
    }
}
