use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::api::setting_engine::DEFAULT_SRTP_ERROR_SILENT_TIME;

/// Which operation produced an SRTP result.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SrtpMode {
    Protect,
    Unprotect,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SrtpErrorKind {
    None,
    Auth,
    Replay,
    Fail,
}

impl SrtpErrorKind {
    pub(crate) fn from_result<T>(result: &srtp::Result<T>) -> Self {
        match result {
            Ok(_) => SrtpErrorKind::None,
            Err(err) if err.is_auth_failure() => SrtpErrorKind::Auth,
            Err(err) if err.is_replay() => SrtpErrorKind::Replay,
            Err(_) => SrtpErrorKind::Fail,
        }
    }
}

impl fmt::Display for SrtpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            SrtpErrorKind::None => "none",
            SrtpErrorKind::Auth => "auth",
            SrtpErrorKind::Replay => "replay",
            SrtpErrorKind::Fail => "fail",
        };
        write!(f, "{s}")
    }
}

pub type OnSrtpErrorHdlrFn = Box<dyn FnMut(u32, SrtpMode, SrtpErrorKind) + Send + 'static>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct FailureKey {
    ssrc: u32,
    mode: SrtpMode,
    error: SrtpErrorKind,
}

/// SrtpStat turns a stream of per packet results into a rate limited error
/// signal: the first failure for a (ssrc, mode, error) key is reported, then
/// the same key stays silent for `signal_silent_time`.
pub struct SrtpStat {
    failures: HashMap<FailureKey, Instant>,
    signal_silent_time: Duration,
    on_srtp_error: Option<OnSrtpErrorHdlrFn>,
}

impl Default for SrtpStat {
    fn default() -> Self {
        SrtpStat::new(DEFAULT_SRTP_ERROR_SILENT_TIME)
    }
}

impl fmt::Debug for SrtpStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrtpStat")
            .field("failures", &self.failures.len())
            .field("signal_silent_time", &self.signal_silent_time)
            .finish()
    }
}

impl SrtpStat {
    pub fn new(signal_silent_time: Duration) -> Self {
        SrtpStat {
            failures: HashMap::new(),
            signal_silent_time,
            on_srtp_error: None,
        }
    }

    pub fn on_srtp_error(&mut self, handler: OnSrtpErrorHdlrFn) {
        self.on_srtp_error = Some(handler);
    }

    pub fn set_signal_silent_time(&mut self, signal_silent_time: Duration) {
        self.signal_silent_time = signal_silent_time;
    }

    pub fn signal_silent_time(&self) -> Duration {
        self.signal_silent_time
    }

    pub(crate) fn add_protect_rtp_result<T>(&mut self, ssrc: u32, result: &srtp::Result<T>) {
        // Replay checks do not run on the sending side.
        let error = match SrtpErrorKind::from_result(result) {
            SrtpErrorKind::Replay => SrtpErrorKind::Fail,
            error => error,
        };
        self.handle_srtp_result(ssrc, SrtpMode::Protect, error, Instant::now());
    }

    pub(crate) fn add_unprotect_rtp_result<T>(&mut self, ssrc: u32, result: &srtp::Result<T>) {
        let error = SrtpErrorKind::from_result(result);
        self.handle_srtp_result(ssrc, SrtpMode::Unprotect, error, Instant::now());
    }

    /// RTCP results are tracked under ssrc 0.
    pub(crate) fn add_protect_rtcp_result<T>(&mut self, result: &srtp::Result<T>) {
        self.add_protect_rtp_result(0, result);
    }

    pub(crate) fn add_unprotect_rtcp_result<T>(&mut self, result: &srtp::Result<T>) {
        self.add_unprotect_rtp_result(0, result);
    }

    /// Returns whether the error was signalled.
    pub(crate) fn handle_srtp_result(
        &mut self,
        ssrc: u32,
        mode: SrtpMode,
        error: SrtpErrorKind,
        now: Instant,
    ) -> bool {
        if error == SrtpErrorKind::None {
            return false;
        }

        let key = FailureKey { ssrc, mode, error };
        let silent = self.failures.get(&key).is_some_and(|last| {
            now.saturating_duration_since(*last) < self.signal_silent_time
        });
        if silent {
            return false;
        }

        self.failures.insert(key, now);
        log::warn!("srtp {mode:?} error for ssrc {ssrc}: {error}");
        if let Some(handler) = &mut self.on_srtp_error {
            handler(ssrc, mode, error);
        }
        true
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_srtp_stat_rate_limits_per_key() {
        let signalled = Arc::new(Mutex::new(vec![]));
        let signalled2 = Arc::clone(&signalled);

        let mut stat = SrtpStat::new(Duration::from_millis(1000));
        stat.on_srtp_error(Box::new(move |ssrc, mode, error| {
            signalled2.lock().unwrap().push((ssrc, mode, error));
        }));

        let t0 = Instant::now();
        let ms = Duration::from_millis;
        use SrtpErrorKind::*;
        use SrtpMode::*;

        assert!(!stat.handle_srtp_result(1, Unprotect, None, t0));
        assert!(stat.handle_srtp_result(1, Unprotect, Auth, t0));
        assert!(!stat.handle_srtp_result(1, Unprotect, Auth, t0 + ms(500)));
        // Different keys are independent.
        assert!(stat.handle_srtp_result(1, Unprotect, Replay, t0 + ms(500)));
        assert!(stat.handle_srtp_result(2, Unprotect, Auth, t0 + ms(500)));
        assert!(stat.handle_srtp_result(1, Protect, Auth, t0 + ms(500)));
        // Silence over.
        assert!(stat.handle_srtp_result(1, Unprotect, Auth, t0 + ms(1000)));

        assert_eq!(
            *signalled.lock().unwrap(),
            vec![
                (1, Unprotect, Auth),
                (1, Unprotect, Replay),
                (2, Unprotect, Auth),
                (1, Protect, Auth),
                (1, Unprotect, Auth),
            ]
        );
    }

    #[test]
    fn test_srtp_stat_classifies_results() {
        let ok: srtp::Result<usize> = Ok(10);
        assert_eq!(SrtpErrorKind::from_result(&ok), SrtpErrorKind::None);

        let auth: srtp::Result<usize> = Err(srtp::Error::RtpFailedToVerifyAuthTag);
        assert_eq!(SrtpErrorKind::from_result(&auth), SrtpErrorKind::Auth);

        let replay: srtp::Result<usize> = Err(srtp::Error::ReplayFail(1, 2));
        assert_eq!(SrtpErrorKind::from_result(&replay), SrtpErrorKind::Replay);

        let old: srtp::Result<usize> = Err(srtp::Error::ReplayOld(1, 2));
        assert_eq!(SrtpErrorKind::from_result(&old), SrtpErrorKind::Replay);

        let other: srtp::Result<usize> = Err(srtp::Error::ErrTooShortRtp);
        assert_eq!(SrtpErrorKind::from_result(&other), SrtpErrorKind::Fail);
    }

    #[test]
    fn test_srtp_stat_zero_silence_signals_every_error() {
        let mut stat = SrtpStat::new(Duration::ZERO);
        let t0 = Instant::now();
        for _ in 0..3 {
            assert!(stat.handle_srtp_result(0, SrtpMode::Protect, SrtpErrorKind::Fail, t0));
        }
    }
}
