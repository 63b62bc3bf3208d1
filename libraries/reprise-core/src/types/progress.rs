/// Per-track progress record
use serde::{Deserialize, Serialize};

/// Persisted playback and listening metadata for one track
///
/// Every field is absent until the event that sets it has happened. Readers
/// go through the `*_or_*` accessors so a missing field reads as zero/unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Track length in seconds, known once media metadata loads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Last committed playback offset in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<f64>,

    /// When the track was last started (ms since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<i64>,

    /// When the track was started for the first time (ms since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_listened: Option<i64>,

    /// Accumulated wall-clock seconds of active playback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_listening_time: Option<f64>,
}

/// Offset to persist for a playback position
///
/// Returns `None` while the duration is unknown. The position is clamped to
/// `[0, duration]`; when at most `threshold` seconds remain the track counts
/// as finished and `0` is returned so the next play starts from the top.
/// The boundary is inclusive: `current_time >= duration - threshold`.
pub fn position_to_save(current_time: f64, duration: f64, threshold: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0.0 || !current_time.is_finite() {
        return None;
    }

    let clamped = current_time.clamp(0.0, duration);
    if clamped >= duration - threshold {
        Some(0.0)
    } else {
        Some(clamped)
    }
}

impl ProgressRecord {
    /// Resume offset, zero when never committed
    pub fn current_time_or_zero(&self) -> f64 {
        self.current_time.unwrap_or(0.0)
    }

    /// Listening total, zero when never committed
    pub fn total_listening_time_or_zero(&self) -> f64 {
        self.total_listening_time.unwrap_or(0.0)
    }

    /// Last start stamp, the epoch when never played
    pub fn last_played_or_epoch(&self) -> i64 {
        self.last_played.unwrap_or(0)
    }

    /// Stamp a track start
    ///
    /// `lastPlayed` never moves backwards and `firstListened` is only set once.
    pub fn mark_started(&mut self, now_ms: i64) {
        self.last_played = Some(self.last_played.map_or(now_ms, |prev| prev.max(now_ms)));
        self.first_listened.get_or_insert(now_ms);
    }

    /// Add listening time; negative or non-finite amounts are ignored
    pub fn add_listening_time(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.total_listening_time = Some(self.total_listening_time_or_zero() + secs);
        }
    }

    /// Refresh the stored duration when a valid one is reported
    pub fn set_duration(&mut self, duration: f64) {
        if duration.is_finite() && duration > 0.0 {
            self.duration = Some(duration);
        }
    }

    /// Commit a playback position using the completion-reset rule
    ///
    /// Returns `false` (and leaves the record untouched) while the duration is
    /// unknown.
    pub fn commit_position(&mut self, current_time: f64, duration: f64, threshold: f64) -> bool {
        match position_to_save(current_time, duration, threshold) {
            Some(offset) => {
                self.duration = Some(duration);
                self.current_time = Some(offset);
                true
            }
            None => false,
        }
    }

    /// Mark the track as finished so it resumes from the start
    pub fn reset_position(&mut self) {
        self.current_time = Some(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_end_resets_to_zero() {
        assert_eq!(position_to_save(195.0, 200.0, 30.0), Some(0.0));
        assert_eq!(position_to_save(169.0, 200.0, 30.0), Some(169.0));
        assert_eq!(position_to_save(150.0, 200.0, 60.0), Some(0.0));
        assert_eq!(position_to_save(139.0, 200.0, 60.0), Some(139.0));
    }

    #[test]
    fn exactly_threshold_remaining_counts_as_finished() {
        assert_eq!(position_to_save(170.0, 200.0, 30.0), Some(0.0));
        assert_eq!(position_to_save(140.0, 200.0, 60.0), Some(0.0));
        assert_eq!(position_to_save(169.5, 200.0, 30.0), Some(169.5));
    }

    #[test]
    fn unknown_duration_saves_nothing() {
        assert_eq!(position_to_save(10.0, f64::NAN, 30.0), None);
        assert_eq!(position_to_save(10.0, f64::INFINITY, 30.0), None);
        assert_eq!(position_to_save(10.0, 0.0, 30.0), None);
        assert_eq!(position_to_save(f64::NAN, 100.0, 30.0), None);
    }

    #[test]
    fn position_is_clamped() {
        assert_eq!(position_to_save(-5.0, 500.0, 30.0), Some(0.0));
        assert_eq!(position_to_save(900.0, 500.0, 30.0), Some(0.0));
    }

    #[test]
    fn first_listened_is_set_once() {
        let mut record = ProgressRecord::default();
        record.mark_started(1_000);
        record.mark_started(5_000);

        assert_eq!(record.first_listened, Some(1_000));
        assert_eq!(record.last_played, Some(5_000));
    }

    #[test]
    fn last_played_never_decreases() {
        let mut record = ProgressRecord::default();
        record.mark_started(5_000);
        record.mark_started(2_000);
        assert_eq!(record.last_played, Some(5_000));
    }

    #[test]
    fn listening_time_ignores_bad_amounts() {
        let mut record = ProgressRecord::default();
        record.add_listening_time(-3.0);
        record.add_listening_time(f64::NAN);
        assert_eq!(record.total_listening_time, None);

        record.add_listening_time(12.5);
        record.add_listening_time(2.5);
        assert_eq!(record.total_listening_time, Some(15.0));
    }

    #[test]
    fn serializes_camel_case_and_skips_absent_fields() {
        let record = ProgressRecord {
            duration: Some(200.0),
            current_time: Some(45.0),
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"duration":200.0,"currentTime":45.0}"#);
    }

    #[test]
    fn reads_records_with_missing_fields() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"lastPlayed":1700000000000}"#).unwrap();

        assert_eq!(record.last_played, Some(1_700_000_000_000));
        assert_eq!(record.current_time_or_zero(), 0.0);
        assert_eq!(record.total_listening_time_or_zero(), 0.0);
        assert_eq!(record.duration, None);
    }
}
