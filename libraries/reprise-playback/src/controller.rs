//! Playback controller
//!
//! Owns the active track, play state and rate, issues transport commands to
//! the media engine, and decides when progress is written back.
//!
//! Persistence points:
//! - **switch**: previous track's listening time and position
//! - **pause**: listening time, then position with the pause threshold
//! - **autosave tick**: position with the tick threshold
//! - **end**: listening time, then position 0
//! - **backgrounded**: listening time and position, play state untouched

use crate::engine::{MediaEngine, PlayRejected, PlayToken};
use crate::events::PlaybackEvent;
use crate::platform::{
    MediaPlaybackState, MediaSessionPort, NoopPlatform, TransportAction, WakeLockPort,
};
use crate::registry::TrackRegistry;
use crate::session::{PlaybackSession, PlayerState};
use crate::timer::{AutosaveTimer, NoopTimer, TimerToken};
use crate::tracker::SessionTracker;
use reprise_core::{Clock, PlayerConfig, RepriseError, Result, SystemClock, Track};
use reprise_storage::ProgressStore;

/// Playback controller
///
/// Single-threaded: every handler takes `&mut self`, so the host delivers
/// engine and timer events one at a time.
pub struct PlaybackController {
    // Collaborators
    registry: TrackRegistry,
    store: ProgressStore,
    engine: Box<dyn MediaEngine>,
    timer: Box<dyn AutosaveTimer>,
    clock: Box<dyn Clock>,
    media_session: Box<dyn MediaSessionPort>,
    wake_lock: Box<dyn WakeLockPort>,

    config: PlayerConfig,

    // State
    session: PlaybackSession,
    tracker: SessionTracker,
    play_requests: u64,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller over `registry` with nothing active
    ///
    /// Uses the system clock, no autosave timer and no platform integration
    /// until the `with_*` builders replace them.
    pub fn new(
        registry: TrackRegistry,
        store: ProgressStore,
        engine: impl MediaEngine + 'static,
        config: PlayerConfig,
    ) -> Self {
        Self {
            registry,
            store,
            engine: Box::new(engine),
            timer: Box::new(NoopTimer),
            clock: Box::new(SystemClock),
            media_session: Box::new(NoopPlatform),
            wake_lock: Box::new(NoopPlatform),
            config,
            session: PlaybackSession::default(),
            tracker: SessionTracker::new(),
            play_requests: 0,
            pending_events: Vec::new(),
        }
    }

    /// Use `clock` for listening time and play stamps
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Use `timer` for periodic saves
    #[must_use]
    pub fn with_timer(mut self, timer: impl AutosaveTimer + 'static) -> Self {
        self.timer = Box::new(timer);
        self
    }

    /// Mirror state to an OS media session
    #[must_use]
    pub fn with_media_session(mut self, session: impl MediaSessionPort + 'static) -> Self {
        self.media_session = Box::new(session);
        self
    }

    /// Hold a wake lock while playing
    #[must_use]
    pub fn with_wake_lock(mut self, wake_lock: impl WakeLockPort + 'static) -> Self {
        self.wake_lock = Box::new(wake_lock);
        self
    }

    // ===== Track Selection =====

    /// Replace the registry after a new folder selection
    ///
    /// The active session is persisted and torn down first.
    pub fn load_registry(&mut self, registry: TrackRegistry) {
        self.teardown();
        self.session.active = None;
        self.set_state(PlayerState::Idle);
        self.registry = registry;
    }

    /// Make the track at `ordinal` active and start playing it
    ///
    /// Out-of-range ordinals change nothing and return
    /// [`RepriseError::IndexOutOfBounds`]. A rejected play is not an error:
    /// the session falls back to paused and a
    /// [`PlaybackEvent::PlayRejected`] is queued.
    pub fn activate(&mut self, ordinal: usize) -> Result<()> {
        let Some(track) = self.registry.get(ordinal).cloned() else {
            tracing::debug!("Ignoring activation of missing track #{}", ordinal);
            return Err(RepriseError::IndexOutOfBounds(ordinal));
        };

        let previous = self.session.active;
        self.teardown();

        let now = self.clock.now_ms();
        self.session.active = Some(ordinal);
        let rate = self.rate();
        self.engine.load(&track.source);
        self.engine.set_playback_rate(rate);

        let record = self.store.update(&track.name, |record| record.mark_started(now));
        self.session.pending_resume = record.current_time.filter(|offset| *offset > 0.0);

        self.tracker
            .begin(self.timer.as_mut(), self.config.autosave_interval(), now);
        self.media_session.set_metadata(&track.name);

        tracing::info!("Activated '{}' (#{})", track.name, ordinal);
        self.emit_track_changed(&track, previous);

        // Rejection already handled and reported through events
        let _ = self.start_playback();
        Ok(())
    }

    /// Activate the following track; no-op on the last one
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        match self.session.active {
            Some(ordinal) if ordinal + 1 < self.registry.len() => self.activate(ordinal + 1),
            _ => {
                tracing::debug!("No next track");
                Ok(())
            }
        }
    }

    /// Activate the preceding track; no-op on the first one
    pub fn previous(&mut self) -> Result<()> {
        match self.session.active {
            Some(ordinal) if ordinal > 0 => self.activate(ordinal - 1),
            _ => {
                tracing::debug!("No previous track");
                Ok(())
            }
        }
    }

    // ===== Playback Control =====

    /// Pause playback and persist progress
    pub fn pause(&mut self) {
        if !self.session.state.is_playing() {
            tracing::debug!("Pause ignored in state {:?}", self.session.state);
            return;
        }

        self.engine.pause();
        if let Some(name) = self.active_name() {
            let now = self.clock.now_ms();
            self.tracker
                .end(self.timer.as_mut(), &self.store, &name, now);
            self.snapshot(&name, self.config.pause_completion_threshold_secs);
        }
        self.set_state(PlayerState::Paused);
    }

    /// Resume the active track
    ///
    /// On rejection the session stays paused and the error is returned.
    pub fn resume(&mut self) -> Result<()> {
        if self.session.active.is_none() {
            tracing::debug!("Resume ignored: no active track");
            return Ok(());
        }
        if self.session.state.is_playing() {
            return Ok(());
        }

        if self.session.state == PlayerState::Idle {
            // Replaying a finished track starts from the top
            if let Some(duration) = self.engine.known_duration() {
                if self.engine.current_time() >= duration {
                    self.engine.set_current_time(0.0);
                }
            }
        }

        let now = self.clock.now_ms();
        self.tracker
            .begin(self.timer.as_mut(), self.config.autosave_interval(), now);

        self.start_playback()
            .map_err(|rejected| RepriseError::playback_rejected(rejected.reason))
    }

    /// Pause when playing, resume otherwise
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.session.state.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.resume()
        }
    }

    /// Persist and pause before the player view is left
    pub fn deactivate_for_navigation_away(&mut self) {
        if self.session.state.is_playing() {
            self.pause();
        } else if let Some(name) = self.active_name() {
            let now = self.clock.now_ms();
            self.tracker
                .end(self.timer.as_mut(), &self.store, &name, now);
        }
    }

    // ===== Seeking =====

    /// Jump to `target` seconds, clamped to the track
    ///
    /// A no-op while the duration is unknown.
    pub fn seek(&mut self, target: f64) {
        if let Err(e) = self.try_seek(target) {
            tracing::debug!("Seek to {} ignored: {}", target, e);
        }
    }

    /// Like [`seek`](Self::seek), but reports an unknown duration
    pub fn try_seek(&mut self, target: f64) -> Result<()> {
        let duration = self
            .engine
            .known_duration()
            .ok_or(RepriseError::UnknownDuration)?;
        if target.is_nan() {
            return Ok(());
        }

        self.engine.set_current_time(target.clamp(0.0, duration));
        // An explicit seek wins over a resume still waiting for metadata
        self.session.pending_resume = None;
        self.on_position_tick();
        Ok(())
    }

    /// Seek to a fraction of the track (progress bar click)
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        if let Some(duration) = self.engine.known_duration() {
            self.seek(fraction.clamp(0.0, 1.0) * duration);
        }
    }

    /// Seek relative to the current position
    pub fn skip_by(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let target = self.engine.current_time() + delta;
        self.seek(target);
    }

    /// Skip back by the small step
    pub fn skip_back_small(&mut self) {
        self.skip_by(-self.config.small_skip_secs);
    }

    /// Skip forward by the small step
    pub fn skip_forward_small(&mut self) {
        self.skip_by(self.config.small_skip_secs);
    }

    /// Skip back by the large step
    pub fn skip_back_large(&mut self) {
        self.skip_by(-self.config.large_skip_secs);
    }

    /// Skip forward by the large step
    pub fn skip_forward_large(&mut self) {
        self.skip_by(self.config.large_skip_secs);
    }

    // ===== Rate =====

    /// Advance to the next playback rate, wrapping; returns the new rate
    pub fn cycle_rate(&mut self) -> f64 {
        let count = self.config.playback_rates.len().max(1);
        self.session.rate_index = (self.session.rate_index + 1) % count;

        let rate = self.rate();
        self.engine.set_playback_rate(rate);
        tracing::debug!("Playback rate {}", rate);
        self.pending_events.push(PlaybackEvent::RateChanged { rate });
        self.on_position_tick();
        rate
    }

    /// Current playback rate
    pub fn rate(&self) -> f64 {
        self.config
            .playback_rates
            .get(self.session.rate_index)
            .copied()
            .unwrap_or(1.0)
    }

    // ===== Engine & Timer Events =====

    /// Periodic autosave
    ///
    /// Ticks whose token is not the running timer's are ignored.
    pub fn on_autosave_tick(&mut self, token: TimerToken) {
        if !self.tracker.is_live(token) {
            tracing::debug!("Ignoring stale autosave tick {:?}", token);
            return;
        }
        if self.session.pending_resume.is_some() {
            // Position is still 0 until the resume is applied
            return;
        }
        if let Some(name) = self.active_name() {
            self.snapshot(&name, self.config.tick_completion_threshold_secs);
        }
    }

    /// Media metadata loaded: the duration is now known
    pub fn on_metadata_loaded(&mut self) {
        let Some(name) = self.active_name() else {
            return;
        };
        let Some(duration) = self.engine.known_duration() else {
            tracing::debug!("Metadata for '{}' has no usable duration", name);
            return;
        };

        self.store.update(&name, |record| record.set_duration(duration));

        if let Some(offset) = self.session.pending_resume.take() {
            let offset = offset.clamp(0.0, duration);
            if offset > 0.0 && offset < duration {
                tracing::info!("Resuming '{}' at {:.1}s", name, offset);
                self.engine.set_current_time(offset);
            }
        }

        if self.session.state == PlayerState::Loading {
            self.set_state(PlayerState::Playing);
        }
        self.on_position_tick();
    }

    /// Engine can play: retry a start the engine did not honour
    pub fn on_can_play(&mut self) {
        if self.session.state.is_playing() && self.engine.is_paused() {
            tracing::debug!("Retrying deferred start");
            match self.request_play() {
                Ok(()) => {}
                Err(rejected) => self.handle_rejection(rejected),
            }
        }
    }

    /// Asynchronous rejection of an earlier `play()`
    ///
    /// Only the latest request counts: a rejection for a request that a later
    /// switch or retry superseded is ignored, as is one arriving after pause.
    pub fn on_play_rejected(&mut self, token: PlayToken, reason: &str) {
        if self.play_token() != Some(token) {
            tracing::debug!("Ignoring rejection of superseded play {:?}: {}", token, reason);
            return;
        }
        if self.session.state.is_playing() {
            self.handle_rejection(PlayRejected::new(reason));
        }
    }

    /// Token of the most recent `play()` request, if any
    pub fn play_token(&self) -> Option<PlayToken> {
        (self.play_requests > 0).then(|| PlayToken::from_raw(self.play_requests))
    }

    /// Active track played to the end
    ///
    /// Stores position 0 and moves on to the next track unless this was the
    /// last one.
    pub fn on_track_ended(&mut self) {
        let Some(ordinal) = self.session.active else {
            return;
        };
        let Some(name) = self.active_name() else {
            return;
        };

        let now = self.clock.now_ms();
        self.tracker
            .end(self.timer.as_mut(), &self.store, &name, now);

        let duration = self.engine.known_duration();
        self.store.update(&name, |record| {
            if let Some(duration) = duration {
                record.set_duration(duration);
            }
            record.reset_position();
        });
        self.emit_progress_saved(&name);

        self.session.pending_resume = None;
        self.set_state(PlayerState::Idle);
        tracing::info!("Finished '{}'", name);

        if ordinal + 1 < self.registry.len() {
            if let Err(e) = self.activate(ordinal + 1) {
                tracing::warn!("Auto-advance failed: {}", e);
            }
        }
    }

    /// Engine position changed; mirrors it to the media session
    pub fn on_position_tick(&mut self) {
        if let Some((position, duration)) = self.sync_position_state() {
            self.pending_events
                .push(PlaybackEvent::PositionUpdate { position, duration });
        }
    }

    /// App moved to the background
    ///
    /// Persists listening time and position. The play state is untouched;
    /// audio that keeps playing is counted again once the app returns.
    pub fn on_visibility_hidden(&mut self) {
        let Some(name) = self.active_name() else {
            return;
        };

        self.tracker.stop_timer(self.timer.as_mut());
        let now = self.clock.now_ms();
        self.tracker
            .commit_listening_time(&self.store, &name, now);

        if self.session.state != PlayerState::Idle {
            self.snapshot(&name, self.config.pause_completion_threshold_secs);
        }
    }

    /// App returned to the foreground
    pub fn on_visibility_visible(&mut self) {
        if !self.session.state.is_playing() {
            return;
        }
        let Some(name) = self.active_name() else {
            return;
        };

        let now = self.clock.now_ms();
        self.tracker
            .commit_listening_time(&self.store, &name, now);
        self.tracker
            .start_timer(self.timer.as_mut(), self.config.autosave_interval());
    }

    /// Dispatch an action from the OS media session
    pub fn handle_action(&mut self, action: TransportAction) -> Result<()> {
        match action {
            TransportAction::Play => self.resume(),
            TransportAction::Pause => {
                self.pause();
                Ok(())
            }
            TransportAction::SeekBackward(offset) => {
                self.skip_by(-offset.unwrap_or(self.config.small_skip_secs));
                Ok(())
            }
            TransportAction::SeekForward(offset) => {
                self.skip_by(offset.unwrap_or(self.config.small_skip_secs));
                Ok(())
            }
            TransportAction::PreviousTrack => self.previous(),
            TransportAction::NextTrack => self.next(),
            TransportAction::SeekTo(target) => {
                self.seek(target);
                Ok(())
            }
        }
    }

    // ===== State Queries =====

    /// Current state
    pub fn state(&self) -> PlayerState {
        self.session.state
    }

    /// Session snapshot
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Active track
    pub fn active_track(&self) -> Option<&Track> {
        self.session.active.and_then(|ordinal| self.registry.get(ordinal))
    }

    /// Engine position in seconds
    pub fn position(&self) -> f64 {
        self.engine.current_time()
    }

    /// Engine duration, if known
    pub fn duration(&self) -> Option<f64> {
        self.engine.known_duration()
    }

    /// Track registry
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    /// Progress store
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Configuration in use
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events that have been emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn active_name(&self) -> Option<String> {
        self.active_track().map(|track| track.name.clone())
    }

    /// Ask the engine to play; Loading until the duration is known
    fn start_playback(&mut self) -> std::result::Result<(), PlayRejected> {
        match self.request_play() {
            Ok(()) => {
                if self.engine.known_duration().is_some() {
                    self.on_metadata_loaded();
                    self.set_state(PlayerState::Playing);
                } else {
                    self.set_state(PlayerState::Loading);
                }
                Ok(())
            }
            Err(rejected) => {
                self.handle_rejection(rejected.clone());
                Err(rejected)
            }
        }
    }

    /// Issue a new `play()` request, superseding earlier ones
    fn request_play(&mut self) -> std::result::Result<(), PlayRejected> {
        self.play_requests += 1;
        self.engine.play()
    }

    fn handle_rejection(&mut self, rejected: PlayRejected) {
        tracing::warn!("Playback rejected: {}", rejected.reason);

        self.engine.pause();
        if let Some(name) = self.active_name() {
            let now = self.clock.now_ms();
            self.tracker
                .end(self.timer.as_mut(), &self.store, &name, now);
        }
        self.set_state(PlayerState::Paused);
        self.pending_events.push(PlaybackEvent::PlayRejected {
            reason: rejected.reason,
        });
    }

    /// Persist the previous track before switching away from it
    fn teardown(&mut self) {
        let Some(name) = self.active_name() else {
            return;
        };

        let now = self.clock.now_ms();
        self.tracker
            .end(self.timer.as_mut(), &self.store, &name, now);
        if self.session.state != PlayerState::Idle {
            self.snapshot(&name, self.config.pause_completion_threshold_secs);
        }
        self.engine.pause();
        self.session.pending_resume = None;
        // Requests for the outgoing source are aborted by the next load
        self.play_requests += 1;
    }

    /// Save the engine position; skipped while a resume is still pending
    fn snapshot(&mut self, name: &str, threshold: f64) {
        if self.session.pending_resume.is_some() {
            return;
        }

        let saved = SessionTracker::autosave(
            &self.store,
            name,
            self.engine.current_time(),
            self.engine.known_duration(),
            threshold,
        );
        if saved.is_some() {
            self.emit_progress_saved(name);
        }
    }

    fn set_state(&mut self, state: PlayerState) {
        let previous = self.session.state;
        if previous == state {
            return;
        }
        self.session.state = state;

        if state == PlayerState::Playing {
            self.wake_lock.acquire();
        } else if previous == PlayerState::Playing {
            self.wake_lock.release();
        }

        self.media_session.set_playback_state(match state {
            PlayerState::Playing | PlayerState::Loading => MediaPlaybackState::Playing,
            PlayerState::Paused => MediaPlaybackState::Paused,
            PlayerState::Idle => MediaPlaybackState::None,
        });
        self.sync_position_state();

        self.emit_state_changed(state);
    }

    /// Push position, duration and rate to the media session
    fn sync_position_state(&mut self) -> Option<(f64, f64)> {
        let duration = self.engine.known_duration()?;
        let position = self.engine.current_time().clamp(0.0, duration);
        let rate = self.rate();
        self.media_session
            .set_position_state(position, duration, rate);
        Some((position, duration))
    }

    /// Emit a state changed event
    fn emit_state_changed(&mut self, state: PlayerState) {
        self.pending_events
            .push(PlaybackEvent::StateChanged { state });
    }

    /// Emit a track changed event
    fn emit_track_changed(&mut self, track: &Track, previous: Option<usize>) {
        self.pending_events.push(PlaybackEvent::TrackChanged {
            ordinal: track.ordinal,
            name: track.name.clone(),
            previous,
        });
    }

    /// Emit a progress saved event
    fn emit_progress_saved(&mut self, name: &str) {
        self.pending_events.push(PlaybackEvent::ProgressSaved {
            name: name.to_string(),
        });
    }
}
