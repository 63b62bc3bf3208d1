//! Platform integration ports
//!
//! The OS media session (lock screen / notification controls) and the screen
//! wake lock. Both are optional; [`NoopPlatform`] stands in when the host
//! has neither.

use serde::{Deserialize, Serialize};

/// Playback state as reported to the OS media session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaPlaybackState {
    /// Nothing loaded or playback ended
    None,
    /// Paused mid-track
    Paused,
    /// Playing
    Playing,
}

/// Outbound surface of the OS media session
pub trait MediaSessionPort {
    /// Announce the active track
    fn set_metadata(&mut self, title: &str);

    /// Mirror the play state
    fn set_playback_state(&mut self, state: MediaPlaybackState);

    /// Mirror position, duration and rate for the scrubber
    fn set_position_state(&mut self, position: f64, duration: f64, rate: f64);
}

/// Screen wake lock held while audio plays
pub trait WakeLockPort {
    /// Request the lock; repeated requests are harmless
    fn acquire(&mut self);

    /// Drop the lock if held
    fn release(&mut self);
}

/// Platform with no media session and no wake lock
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlatform;

impl MediaSessionPort for NoopPlatform {
    fn set_metadata(&mut self, _title: &str) {}

    fn set_playback_state(&mut self, _state: MediaPlaybackState) {}

    fn set_position_state(&mut self, _position: f64, _duration: f64, _rate: f64) {}
}

impl WakeLockPort for NoopPlatform {
    fn acquire(&mut self) {}

    fn release(&mut self) {}
}

/// Inbound action from the OS media session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum TransportAction {
    /// Resume
    Play,
    /// Pause
    Pause,
    /// Skip backwards by the given offset, or the small skip
    SeekBackward(Option<f64>),
    /// Skip forwards by the given offset, or the small skip
    SeekForward(Option<f64>),
    /// Activate the previous track
    PreviousTrack,
    /// Activate the next track
    NextTrack,
    /// Absolute seek in seconds
    SeekTo(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_action_json_shape() {
        let action: TransportAction =
            serde_json::from_str(r#"{"action":"seekForward","value":30.0}"#).unwrap();
        assert_eq!(action, TransportAction::SeekForward(Some(30.0)));

        let action: TransportAction =
            serde_json::from_str(r#"{"action":"seekBackward","value":null}"#).unwrap();
        assert_eq!(action, TransportAction::SeekBackward(None));

        let action: TransportAction = serde_json::from_str(r#"{"action":"play"}"#).unwrap();
        assert_eq!(action, TransportAction::Play);
    }
}
