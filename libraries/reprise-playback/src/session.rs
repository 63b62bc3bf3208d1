//! Ephemeral playback session state

use serde::{Deserialize, Serialize};

/// Controller state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// No track playing (nothing selected, or the active track ended)
    #[default]
    Idle,
    /// Play requested, waiting for metadata
    Loading,
    /// Playing audio
    Playing,
    /// Paused mid-track
    Paused,
}

impl PlayerState {
    /// Whether the session intends audio to be running
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing | Self::Loading)
    }
}

/// Per-activation session state
///
/// Reset on every track switch; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSession {
    pub(crate) active: Option<usize>,
    pub(crate) state: PlayerState,
    pub(crate) rate_index: usize,
    pub(crate) pending_resume: Option<f64>,
}

impl PlaybackSession {
    /// Ordinal of the active track
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Current state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Index into the configured rate list
    pub fn rate_index(&self) -> usize {
        self.rate_index
    }

    /// Resume offset waiting for metadata, if any
    pub fn pending_resume(&self) -> Option<f64> {
        self.pending_resume
    }
}
