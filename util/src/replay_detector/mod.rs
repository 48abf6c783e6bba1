#[cfg(test)]
mod replay_detector_test;

use super::fixed_big_int::*;

/// Outcome of checking a sequence number against the replay window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReplayCheck {
    /// Not seen before and inside (or ahead of) the window.
    Valid,
    /// Already accepted once.
    Duplicated,
    /// Behind the window or above the configured maximum.
    TooOld,
}

impl ReplayCheck {
    pub fn is_valid(&self) -> bool {
        *self == ReplayCheck::Valid
    }
}

// ReplayDetector is the interface of sequence replay detector.
pub trait ReplayDetector {
    // check classifies the given sequence number. Call accept() afterwards
    // to mark the packet as received properly.
    fn check(&mut self, seq: u64) -> ReplayCheck;
    fn accept(&mut self);
}

/// SlidingWindowDetector tracks a bitmap of the last `window_size` indexes
/// below the highest accepted one. It never wraps, so callers feed it an
/// extended index (48 bits for SRTP, 31 bits for SRTCP).
pub struct SlidingWindowDetector {
    accepted: bool,
    seq: u64,
    latest_seq: u64,
    max_seq: u64,
    window_size: usize,
    mask: FixedBigInt,
}

impl SlidingWindowDetector {
    pub fn new(window_size: usize, max_seq: u64) -> Self {
        SlidingWindowDetector {
            accepted: false,
            seq: 0,
            latest_seq: 0,
            max_seq,
            window_size,
            mask: FixedBigInt::new(window_size),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }
}

impl ReplayDetector for SlidingWindowDetector {
    fn check(&mut self, seq: u64) -> ReplayCheck {
        self.accepted = false;

        if seq > self.max_seq {
            log::trace!("replay check: {seq} exceeds upper limit {}", self.max_seq);
            return ReplayCheck::TooOld;
        }

        if seq <= self.latest_seq {
            if self.latest_seq >= self.window_size as u64 + seq {
                return ReplayCheck::TooOld;
            }
            if self.mask.bit((self.latest_seq - seq) as usize) != 0 {
                return ReplayCheck::Duplicated;
            }
        }

        self.accepted = true;
        self.seq = seq;
        ReplayCheck::Valid
    }

    fn accept(&mut self) {
        if !self.accepted {
            return;
        }
        self.accepted = false;

        if self.seq > self.latest_seq {
            // Update the head of the window.
            self.mask.lsh((self.seq - self.latest_seq) as usize);
            self.latest_seq = self.seq;
        }
        self.mask.set_bit((self.latest_seq - self.seq) as usize);
    }
}

#[derive(Default)]
pub struct NoOpReplayDetector;

impl ReplayDetector for NoOpReplayDetector {
    fn check(&mut self, _: u64) -> ReplayCheck {
        ReplayCheck::Valid
    }
    fn accept(&mut self) {}
}
