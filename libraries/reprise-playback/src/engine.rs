//! Platform-agnostic media engine trait
//!
//! Abstracts the element that actually plays audio (an `<audio>` element in
//! the browser, a simulation in tests and the CLI).

use thiserror::Error;

/// The engine refused to start playback
///
/// Browsers reject `play()` when autoplay policy forbids it or the source
/// cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PlayRejected {
    /// Reason reported by the engine
    pub reason: String,
}

impl PlayRejected {
    /// Create a rejection with a reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Identity of one `play()` request
///
/// Engines that settle `play()` later (a browser promise) report the
/// outcome against the request that started it. Only the most recent request
/// is live; loading a new source aborts earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayToken(u64);

impl PlayToken {
    /// Rebuild a token from its raw generation (e.g. after crossing into JS)
    pub fn from_raw(generation: u64) -> Self {
        Self(generation)
    }

    /// Raw generation number
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Media engine port
///
/// Asynchronous engine events (metadata loaded, ended, can-play, position
/// ticks) are delivered by the host calling the controller's `on_*` handlers.
pub trait MediaEngine {
    /// Point the engine at a new source; position resets to 0
    fn load(&mut self, source: &str);

    /// Start or resume playback
    fn play(&mut self) -> Result<(), PlayRejected>;

    /// Pause playback; a no-op when already paused
    fn pause(&mut self);

    /// Whether the engine is currently paused (or never started)
    fn is_paused(&self) -> bool;

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Jump to a position in seconds
    fn set_current_time(&mut self, secs: f64);

    /// Track length in seconds, `None` until metadata has loaded
    fn duration(&self) -> Option<f64>;

    /// Current playback rate
    fn playback_rate(&self) -> f64;

    /// Change the playback rate
    fn set_playback_rate(&mut self, rate: f64);

    /// Duration, filtered to finite positive values
    fn known_duration(&self) -> Option<f64> {
        self.duration().filter(|d| d.is_finite() && *d > 0.0)
    }
}
