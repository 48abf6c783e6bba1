use util::replay_detector::*;

use crate::key_derivation::{MAX_SRTCP_INDEX, MAX_SRTP_INDEX};

pub type ContextOption = Box<dyn Fn() -> Box<dyn ReplayDetector + Send + 'static> + Send>;

pub const DEFAULT_REPLAY_WINDOW_SIZE: usize = 1024;
pub const MIN_REPLAY_WINDOW_SIZE: usize = 64;
pub const MAX_REPLAY_WINDOW_SIZE: usize = 32768;

/// srtp_replay_protection sets SRTP replay protection window size.
/// The window slides over the 48 bit extended packet index.
pub fn srtp_replay_protection(window_size: usize) -> ContextOption {
    Box::new(move || -> Box<dyn ReplayDetector + Send + 'static> {
        Box::new(SlidingWindowDetector::new(window_size, MAX_SRTP_INDEX))
    })
}

/// Sets SRTCP replay protection window size.
pub fn srtcp_replay_protection(window_size: usize) -> ContextOption {
    Box::new(move || -> Box<dyn ReplayDetector + Send + 'static> {
        Box::new(SlidingWindowDetector::new(window_size, MAX_SRTCP_INDEX))
    })
}

/// srtp_no_replay_protection disables SRTP replay protection.
pub fn srtp_no_replay_protection() -> ContextOption {
    Box::new(|| -> Box<dyn ReplayDetector + Send + 'static> { Box::<NoOpReplayDetector>::default() })
}

/// srtcp_no_replay_protection disables SRTCP replay protection.
pub fn srtcp_no_replay_protection() -> ContextOption {
    Box::new(|| -> Box<dyn ReplayDetector + Send + 'static> { Box::<NoOpReplayDetector>::default() })
}
