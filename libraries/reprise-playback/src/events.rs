//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued by
//! the controller and drained by the host:
//! - State changes (idle/loading/playing/paused)
//! - Track changes
//! - Progress commits (so the list view can re-render)
//! - Rate changes and rejected playback
//! - Position updates (mirrors of the engine's timeupdate)

use crate::session::PlayerState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    /// Player state changed
    StateChanged {
        /// The new state
        state: PlayerState,
    },

    /// A different track became active
    TrackChanged {
        /// Ordinal of the new track
        ordinal: usize,
        /// Name of the new track
        name: String,
        /// Ordinal of the previously active track (if any)
        previous: Option<usize>,
    },

    /// A track's progress record was written
    ProgressSaved {
        /// Track name
        name: String,
    },

    /// Playback rate changed
    RateChanged {
        /// New rate
        rate: f64,
    },

    /// The engine refused to play
    PlayRejected {
        /// Reason reported by the engine
        reason: String,
    },

    /// Position update
    PositionUpdate {
        /// Current position in seconds
        position: f64,
        /// Track length in seconds
        duration: f64,
    },
}
