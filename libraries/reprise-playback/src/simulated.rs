//! Simulated platform
//!
//! In-process stand-ins for the media engine, autosave timer and OS media
//! session. Every type is a cheap handle: clones share state, so a caller can
//! keep one handle for inspection while the controller owns another.
//!
//! Used by the CLI to drive the engine without audio output, and by tests.

use crate::engine::{MediaEngine, PlayRejected};
use crate::platform::{MediaPlaybackState, MediaSessionPort, WakeLockPort};
use crate::timer::{AutosaveTimer, TimerToken};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ===== Engine =====

#[derive(Debug)]
struct EngineState {
    source: Option<String>,
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
    rate: f64,
    durations: HashMap<String, f64>,
    reject_next_play: Option<String>,
    loads: Vec<String>,
    play_calls: usize,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            source: None,
            paused: true,
            current_time: 0.0,
            duration: None,
            rate: 1.0,
            durations: HashMap::new(),
            reject_next_play: None,
            loads: Vec::new(),
            play_calls: 0,
        }
    }
}

/// Media engine that advances only when told to
#[derive(Debug, Clone, Default)]
pub struct SimulatedEngine {
    state: Arc<Mutex<EngineState>>,
}

impl SimulatedEngine {
    /// Create an engine with nothing loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `source` report `duration` as soon as it is loaded
    pub fn register(&self, source: impl Into<String>, duration: f64) {
        lock(&self.state).durations.insert(source.into(), duration);
    }

    /// Reveal the duration of the loaded source (metadata arrived)
    pub fn set_duration(&self, duration: f64) {
        lock(&self.state).duration = Some(duration);
    }

    /// Reject the next `play()` call with `reason`
    pub fn reject_next_play(&self, reason: impl Into<String>) {
        lock(&self.state).reject_next_play = Some(reason.into());
    }

    /// Stop playback from the engine side (e.g. OS interruption)
    pub fn interrupt(&self) {
        lock(&self.state).paused = true;
    }

    /// Play `secs` of wall-clock time at the current rate
    ///
    /// Returns `true` when the position reached the end of a known duration.
    pub fn advance(&self, secs: f64) -> bool {
        let mut state = lock(&self.state);
        if state.paused {
            return false;
        }

        let mut position = state.current_time + secs * state.rate;
        if let Some(duration) = state.duration {
            if position >= duration {
                position = duration;
                state.paused = true;
                state.current_time = position;
                return true;
            }
        }
        state.current_time = position;
        false
    }

    /// Sources passed to `load`, in order
    pub fn loads(&self) -> Vec<String> {
        lock(&self.state).loads.clone()
    }

    /// Currently loaded source
    pub fn source(&self) -> Option<String> {
        lock(&self.state).source.clone()
    }

    /// Number of `play()` calls so far
    pub fn play_calls(&self) -> usize {
        lock(&self.state).play_calls
    }
}

impl MediaEngine for SimulatedEngine {
    fn load(&mut self, source: &str) {
        let mut state = lock(&self.state);
        state.source = Some(source.to_string());
        state.loads.push(source.to_string());
        state.paused = true;
        state.current_time = 0.0;
        state.duration = state.durations.get(source).copied();
    }

    fn play(&mut self) -> Result<(), PlayRejected> {
        let mut state = lock(&self.state);
        state.play_calls += 1;
        if let Some(reason) = state.reject_next_play.take() {
            state.paused = true;
            return Err(PlayRejected::new(reason));
        }
        if state.source.is_none() {
            return Err(PlayRejected::new("no source loaded"));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        lock(&self.state).paused = true;
    }

    fn is_paused(&self) -> bool {
        lock(&self.state).paused
    }

    fn current_time(&self) -> f64 {
        lock(&self.state).current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        let mut state = lock(&self.state);
        state.current_time = match state.duration {
            Some(duration) => secs.clamp(0.0, duration),
            None => secs.max(0.0),
        };
    }

    fn duration(&self) -> Option<f64> {
        lock(&self.state).duration
    }

    fn playback_rate(&self) -> f64 {
        lock(&self.state).rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        lock(&self.state).rate = rate;
    }
}

// ===== Timer =====

#[derive(Debug, Default)]
struct TimerState {
    running: Option<(Duration, TimerToken)>,
    starts: usize,
    stops: usize,
}

/// Autosave timer fired by hand
///
/// Records the running period and token; the caller delivers ticks by
/// passing [`ManualTimer::token`] to the controller.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Arc<Mutex<TimerState>>,
}

impl ManualTimer {
    /// Create a stopped timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a timer is running
    pub fn is_running(&self) -> bool {
        lock(&self.state).running.is_some()
    }

    /// Token of the running timer
    pub fn token(&self) -> Option<TimerToken> {
        lock(&self.state).running.map(|(_, token)| token)
    }

    /// Period of the running timer
    pub fn period(&self) -> Option<Duration> {
        lock(&self.state).running.map(|(period, _)| period)
    }

    /// Number of starts so far
    pub fn starts(&self) -> usize {
        lock(&self.state).starts
    }

    /// Number of stops so far
    pub fn stops(&self) -> usize {
        lock(&self.state).stops
    }
}

impl AutosaveTimer for ManualTimer {
    fn start(&mut self, period: Duration, token: TimerToken) {
        let mut state = lock(&self.state);
        state.running = Some((period, token));
        state.starts += 1;
    }

    fn stop(&mut self) {
        let mut state = lock(&self.state);
        if state.running.take().is_some() {
            state.stops += 1;
        }
    }
}

// ===== Media session / wake lock =====

#[derive(Debug, Default)]
struct PlatformState {
    title: Option<String>,
    playback_state: Option<MediaPlaybackState>,
    position: Option<(f64, f64, f64)>,
    wake_lock_held: bool,
    wake_lock_acquisitions: usize,
}

/// Media session and wake lock that record what they were told
#[derive(Debug, Clone, Default)]
pub struct RecordingPlatform {
    state: Arc<Mutex<PlatformState>>,
}

impl RecordingPlatform {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Last announced track title
    pub fn title(&self) -> Option<String> {
        lock(&self.state).title.clone()
    }

    /// Last announced playback state
    pub fn playback_state(&self) -> Option<MediaPlaybackState> {
        lock(&self.state).playback_state
    }

    /// Last announced `(position, duration, rate)`
    pub fn position_state(&self) -> Option<(f64, f64, f64)> {
        lock(&self.state).position
    }

    /// Whether the wake lock is held
    pub fn wake_lock_held(&self) -> bool {
        lock(&self.state).wake_lock_held
    }

    /// Number of wake lock acquisitions
    pub fn wake_lock_acquisitions(&self) -> usize {
        lock(&self.state).wake_lock_acquisitions
    }
}

impl MediaSessionPort for RecordingPlatform {
    fn set_metadata(&mut self, title: &str) {
        lock(&self.state).title = Some(title.to_string());
    }

    fn set_playback_state(&mut self, playback_state: MediaPlaybackState) {
        lock(&self.state).playback_state = Some(playback_state);
    }

    fn set_position_state(&mut self, position: f64, duration: f64, rate: f64) {
        lock(&self.state).position = Some((position, duration, rate));
    }
}

impl WakeLockPort for RecordingPlatform {
    fn acquire(&mut self) {
        let mut state = lock(&self.state);
        if !state.wake_lock_held {
            state.wake_lock_held = true;
            state.wake_lock_acquisitions += 1;
        }
    }

    fn release(&mut self) {
        lock(&self.state).wake_lock_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_advances_only_while_playing() {
        let mut engine = SimulatedEngine::new();
        engine.register("a.mp3", 10.0);
        engine.load("a.mp3");

        assert!(!engine.advance(3.0));
        assert_eq!(engine.current_time(), 0.0);

        engine.play().unwrap();
        engine.set_playback_rate(2.0);
        assert!(!engine.advance(3.0));
        assert_eq!(engine.current_time(), 6.0);

        assert!(engine.advance(3.0));
        assert_eq!(engine.current_time(), 10.0);
        assert!(engine.is_paused());
    }

    #[test]
    fn rejection_is_one_shot() {
        let mut engine = SimulatedEngine::new();
        engine.load("a.mp3");
        engine.reject_next_play("NotAllowedError");

        assert_eq!(engine.play(), Err(PlayRejected::new("NotAllowedError")));
        assert!(engine.play().is_ok());
        assert_eq!(engine.play_calls(), 2);
    }
}
