//! Listening session tracker
//!
//! Measures wall-clock listening time for the active track and owns the
//! autosave timer. Time between the start mark and a commit is added to the
//! track's `totalListeningTime`; the mark then moves to the commit instant so
//! no interval is ever counted twice.

use crate::timer::{AutosaveTimer, TimerToken};
use reprise_core::ProgressRecord;
use reprise_storage::ProgressStore;
use std::time::Duration;

/// Tracks one active listening session at a time
#[derive(Debug, Default)]
pub struct SessionTracker {
    session_start_ms: Option<i64>,
    live_token: Option<TimerToken>,
    next_generation: u64,
}

impl SessionTracker {
    /// Create an idle tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Start measuring from `now_ms` and (re)start the autosave timer
    ///
    /// Any timer still running is stopped first.
    pub fn begin(
        &mut self,
        timer: &mut dyn AutosaveTimer,
        period: Duration,
        now_ms: i64,
    ) -> TimerToken {
        self.session_start_ms = Some(now_ms);
        self.start_timer(timer, period)
    }

    /// Start a fresh autosave timer without touching the start mark
    pub fn start_timer(&mut self, timer: &mut dyn AutosaveTimer, period: Duration) -> TimerToken {
        self.stop_timer(timer);

        let token = TimerToken::from_raw(self.next_generation);
        self.next_generation += 1;
        self.live_token = Some(token);
        timer.start(period, token);
        token
    }

    /// Stop the autosave timer; later ticks with its token are stale
    pub fn stop_timer(&mut self, timer: &mut dyn AutosaveTimer) {
        if self.live_token.take().is_some() {
            timer.stop();
        }
    }

    /// Whether `token` belongs to the running timer
    pub fn is_live(&self, token: TimerToken) -> bool {
        self.live_token == Some(token)
    }

    /// Token of the running timer
    pub fn live_token(&self) -> Option<TimerToken> {
        self.live_token
    }

    /// Start mark of the current measurement
    pub fn session_start_ms(&self) -> Option<i64> {
        self.session_start_ms
    }

    /// Whether listening time is being measured
    pub fn is_measuring(&self) -> bool {
        self.session_start_ms.is_some()
    }

    /// Add the time since the start mark to `name`'s total
    ///
    /// A no-op without a start mark. Otherwise the mark moves to `now_ms`.
    /// Returns the seconds added. A clock that went backwards adds nothing.
    pub fn commit_listening_time(
        &mut self,
        store: &ProgressStore,
        name: &str,
        now_ms: i64,
    ) -> Option<f64> {
        let start = self.session_start_ms?;
        let elapsed = ((now_ms - start).max(0) as f64) / 1000.0;

        store.update(name, |record| record.add_listening_time(elapsed));
        self.session_start_ms = Some(now_ms);

        tracing::debug!("Committed {:.1}s of listening to '{}'", elapsed, name);
        Some(elapsed)
    }

    /// Deactivate: stop the timer, commit, and clear the mark
    ///
    /// Paused time after this point is never counted.
    pub fn end(
        &mut self,
        timer: &mut dyn AutosaveTimer,
        store: &ProgressStore,
        name: &str,
        now_ms: i64,
    ) -> Option<f64> {
        self.stop_timer(timer);
        let added = self.commit_listening_time(store, name, now_ms);
        self.session_start_ms = None;
        added
    }

    /// Periodic save of position and duration
    ///
    /// Listening time, `lastPlayed` and `firstListened` are preserved as
    /// stored. Returns `None` (and writes nothing) while the duration is
    /// unknown.
    pub fn autosave(
        store: &ProgressStore,
        name: &str,
        current_time: f64,
        duration: Option<f64>,
        threshold: f64,
    ) -> Option<ProgressRecord> {
        let duration = duration?;
        reprise_core::position_to_save(current_time, duration, threshold)?;

        Some(store.update(name, |record| {
            record.commit_position(current_time, duration, threshold);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::ManualTimer;

    #[test]
    fn tokens_are_fresh_per_start() {
        let mut tracker = SessionTracker::new();
        let mut timer = ManualTimer::new();

        let first = tracker.begin(&mut timer, Duration::from_secs(30), 0);
        let second = tracker.begin(&mut timer, Duration::from_secs(30), 10);

        assert_ne!(first, second);
        assert!(!tracker.is_live(first));
        assert!(tracker.is_live(second));
        assert_eq!(timer.token(), Some(second));
    }

    #[test]
    fn commit_without_mark_is_noop() {
        let store = ProgressStore::in_memory();
        let mut tracker = SessionTracker::new();

        assert_eq!(tracker.commit_listening_time(&store, "song", 5_000), None);
        assert_eq!(store.get("song"), None);
    }

    #[test]
    fn commit_moves_mark() {
        let store = ProgressStore::in_memory();
        let mut tracker = SessionTracker::new();
        let mut timer = ManualTimer::new();
        tracker.begin(&mut timer, Duration::from_secs(30), 0);

        assert_eq!(tracker.commit_listening_time(&store, "song", 10_000), Some(10.0));
        assert_eq!(tracker.commit_listening_time(&store, "song", 15_000), Some(5.0));
        assert_eq!(
            store.get("song").unwrap().total_listening_time,
            Some(15.0)
        );
    }

    #[test]
    fn end_clears_mark_and_timer() {
        let store = ProgressStore::in_memory();
        let mut tracker = SessionTracker::new();
        let mut timer = ManualTimer::new();
        tracker.begin(&mut timer, Duration::from_secs(30), 0);

        tracker.end(&mut timer, &store, "song", 4_000);
        assert!(!tracker.is_measuring());
        assert!(!timer.is_running());

        // Time spent idle afterwards is not counted
        assert_eq!(tracker.commit_listening_time(&store, "song", 60_000), None);
        assert_eq!(store.get("song").unwrap().total_listening_time, Some(4.0));
    }

    #[test]
    fn backwards_clock_adds_nothing() {
        let store = ProgressStore::in_memory();
        let mut tracker = SessionTracker::new();
        let mut timer = ManualTimer::new();
        tracker.begin(&mut timer, Duration::from_secs(30), 10_000);

        assert_eq!(tracker.commit_listening_time(&store, "song", 5_000), Some(0.0));
        assert_eq!(store.get("song").unwrap().total_listening_time, None);
    }

    #[test]
    fn autosave_preserves_stats() {
        let store = ProgressStore::in_memory();
        store.update("song", |r| {
            r.mark_started(1_000);
            r.add_listening_time(12.0);
        });

        let saved = SessionTracker::autosave(&store, "song", 150.0, Some(200.0), 60.0).unwrap();
        assert_eq!(saved.current_time, Some(0.0));
        assert_eq!(saved.duration, Some(200.0));
        assert_eq!(saved.total_listening_time, Some(12.0));
        assert_eq!(saved.first_listened, Some(1_000));

        assert!(SessionTracker::autosave(&store, "other", 10.0, None, 60.0).is_none());
        assert_eq!(store.get("other"), None);
    }
}
