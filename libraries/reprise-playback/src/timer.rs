//! Autosave timer port

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity of one started autosave timer
///
/// Every start hands out a new generation. The host passes the token back
/// with each tick so ticks from a timer that has since been replaced can be
/// recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Rebuild a token from its raw generation (e.g. after crossing into JS)
    pub fn from_raw(generation: u64) -> Self {
        Self(generation)
    }

    /// Raw generation number
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Repeating timer driving periodic progress saves
///
/// At most one timer runs at a time. `start` replaces any running timer.
pub trait AutosaveTimer {
    /// Start ticking every `period`, tagging ticks with `token`
    fn start(&mut self, period: Duration, token: TimerToken);

    /// Stop the running timer, if any
    fn stop(&mut self);
}

/// Timer that never fires
///
/// For hosts that only persist on pause, end and switch.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTimer;

impl AutosaveTimer for NoopTimer {
    fn start(&mut self, _period: Duration, _token: TimerToken) {}

    fn stop(&mut self) {}
}
