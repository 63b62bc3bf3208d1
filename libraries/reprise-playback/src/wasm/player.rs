//! WASM-compatible player wrapper

use super::engine::{HtmlMediaEngine, JsPlatform, JsTimer};
use crate::hidden::{HiddenList, ViewMode};
use crate::platform::TransportAction;
use crate::registry::TrackRegistry;
use crate::session::PlayerState;
use crate::engine::PlayToken;
use crate::timer::TimerToken;
use crate::view::list_view;
use crate::PlaybackController;
use js_sys::{Function, Object, Promise, Reflect};
use reprise_core::{Clock, ImportedFile, PlayerConfig, RepriseError, SystemClock};
use reprise_storage::{LocalStorageBackend, ProgressStore, UnavailableBackend};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlMediaElement;

/// WASM-compatible player
///
/// Wraps the controller and hidden list with a JavaScript-friendly API. The
/// glue forwards `<audio>` events (`loadedmetadata`, `canplay`, `ended`,
/// `timeupdate`), `visibilitychange`, media session actions and the
/// autosave interval into the matching methods.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: PlaybackController,
    hidden: HiddenList,
    platform: JsPlatform,
    play_promise: Rc<RefCell<Option<Promise>>>,

    // Event callback
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player around an `<audio>` element
    ///
    /// `start_timer(periodMs, token)` / `stop_timer()` drive the autosave
    /// interval.
    #[wasm_bindgen(constructor)]
    pub fn new(audio: HtmlMediaElement, start_timer: Function, stop_timer: Function) -> Self {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let store = match LocalStorageBackend::open() {
            Ok(backend) => ProgressStore::new(backend),
            Err(e) => {
                tracing::warn!("localStorage unavailable, progress will not be kept: {}", e);
                ProgressStore::new(UnavailableBackend)
            }
        };

        let play_promise = Rc::new(RefCell::new(None));
        let platform = JsPlatform::default();
        let inner = PlaybackController::new(
            TrackRegistry::default(),
            store.clone(),
            HtmlMediaEngine::new(audio, play_promise.clone()),
            PlayerConfig::default(),
        )
        .with_timer(JsTimer::new(start_timer, stop_timer))
        .with_media_session(platform.clone())
        .with_wake_lock(platform.clone());

        Self {
            inner,
            hidden: HiddenList::load(store),
            platform,
            play_promise,
            on_event: None,
        }
    }

    // ===== Library =====

    /// Import a folder selection: `[{ name, type, source }]`
    ///
    /// Returns the number of tracks, or rejects with the user-facing message
    /// when no MP3 files were selected.
    #[wasm_bindgen(js_name = importFiles)]
    pub fn import_files(&mut self, files: JsValue) -> Result<usize, JsValue> {
        let files: Vec<ImportedFile> = serde_wasm_bindgen::from_value(files)
            .map_err(|e| JsValue::from_str(&format!("Invalid file list: {}", e)))?;

        let registry = TrackRegistry::import(files).map_err(|e| self.handle_error(e))?;
        let count = registry.len();
        self.inner.load_registry(registry);
        self.flush_events();
        Ok(count)
    }

    /// Rows of the track list as currently filtered
    #[wasm_bindgen(js_name = trackList)]
    pub fn track_list(&self) -> JsValue {
        let rows = list_view(
            self.inner.registry(),
            self.inner.store(),
            &self.hidden,
            SystemClock.now_ms(),
        );
        serde_wasm_bindgen::to_value(&rows).unwrap_or(JsValue::NULL)
    }

    /// Stored progress record for `name`
    pub fn progress(&self, name: &str) -> JsValue {
        match self.inner.store().get(name) {
            Some(record) => serde_wasm_bindgen::to_value(&record).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    // ===== Playback Control =====

    /// Activate a track by ordinal
    ///
    /// Returns `{ promise, token }` for a pending `play()` (or `undefined`)
    /// so the glue can report a late rejection through
    /// `playRejected(token, reason)`.
    pub fn activate(&mut self, ordinal: usize) -> JsValue {
        if let Err(e) = self.inner.activate(ordinal) {
            self.handle_error(e);
        }
        self.after_play()
    }

    /// Toggle between playing and paused
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&mut self) -> JsValue {
        if let Err(e) = self.inner.toggle_play_pause() {
            self.handle_error(e);
        }
        self.after_play()
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.inner.pause();
        self.flush_events();
    }

    /// Skip to next track
    pub fn next(&mut self) -> JsValue {
        if let Err(e) = self.inner.next() {
            self.handle_error(e);
        }
        self.after_play()
    }

    /// Go to previous track
    pub fn previous(&mut self) -> JsValue {
        if let Err(e) = self.inner.previous() {
            self.handle_error(e);
        }
        self.after_play()
    }

    /// Seek to an absolute position in seconds
    pub fn seek(&mut self, secs: f64) {
        self.inner.seek(secs);
        self.flush_events();
    }

    /// Seek to a fraction of the track (0.0-1.0)
    #[wasm_bindgen(js_name = seekToFraction)]
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        self.inner.seek_to_fraction(fraction);
        self.flush_events();
    }

    /// Skip back by the small step
    #[wasm_bindgen(js_name = skipBackSmall)]
    pub fn skip_back_small(&mut self) {
        self.inner.skip_back_small();
        self.flush_events();
    }

    /// Skip forward by the small step
    #[wasm_bindgen(js_name = skipForwardSmall)]
    pub fn skip_forward_small(&mut self) {
        self.inner.skip_forward_small();
        self.flush_events();
    }

    /// Skip back by the large step
    #[wasm_bindgen(js_name = skipBackLarge)]
    pub fn skip_back_large(&mut self) {
        self.inner.skip_back_large();
        self.flush_events();
    }

    /// Skip forward by the large step
    #[wasm_bindgen(js_name = skipForwardLarge)]
    pub fn skip_forward_large(&mut self) {
        self.inner.skip_forward_large();
        self.flush_events();
    }

    /// Cycle the playback rate; returns the new rate
    #[wasm_bindgen(js_name = cycleRate)]
    pub fn cycle_rate(&mut self) -> f64 {
        let rate = self.inner.cycle_rate();
        self.flush_events();
        rate
    }

    /// Handle a media session action: `{ action, value }`
    #[wasm_bindgen(js_name = mediaAction)]
    pub fn media_action(&mut self, action: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<TransportAction>(action) {
            Ok(action) => {
                if let Err(e) = self.inner.handle_action(action) {
                    self.handle_error(e);
                }
            }
            Err(e) => tracing::warn!("Unknown media action: {}", e),
        }
        self.after_play()
    }

    // ===== Element & Page Events =====

    /// `loadedmetadata`
    #[wasm_bindgen(js_name = metadataLoaded)]
    pub fn metadata_loaded(&mut self) {
        self.inner.on_metadata_loaded();
        self.flush_events();
    }

    /// `canplay`
    #[wasm_bindgen(js_name = canPlay)]
    pub fn can_play(&mut self) -> JsValue {
        self.inner.on_can_play();
        self.after_play()
    }

    /// Rejection of a `play()` promise, tagged with the token it came with
    #[wasm_bindgen(js_name = playRejected)]
    pub fn play_rejected(&mut self, token: f64, reason: &str) {
        self.inner
            .on_play_rejected(PlayToken::from_raw(token as u64), reason);
        self.flush_events();
    }

    /// `ended`
    #[wasm_bindgen(js_name = trackEnded)]
    pub fn track_ended(&mut self) -> JsValue {
        self.inner.on_track_ended();
        self.after_play()
    }

    /// `timeupdate`
    #[wasm_bindgen(js_name = timeUpdate)]
    pub fn time_update(&mut self) {
        self.inner.on_position_tick();
        self.flush_events();
    }

    /// Autosave interval fired
    #[wasm_bindgen(js_name = autosaveTick)]
    pub fn autosave_tick(&mut self, token: f64) {
        self.inner.on_autosave_tick(TimerToken::from_raw(token as u64));
        self.flush_events();
    }

    /// `visibilitychange`
    #[wasm_bindgen(js_name = visibilityChanged)]
    pub fn visibility_changed(&mut self, hidden: bool) {
        if hidden {
            self.inner.on_visibility_hidden();
        } else {
            self.inner.on_visibility_visible();
        }
        self.flush_events();
    }

    /// Back to the track list
    #[wasm_bindgen(js_name = navigateAway)]
    pub fn navigate_away(&mut self) {
        self.inner.deactivate_for_navigation_away();
        self.flush_events();
    }

    // ===== Hidden List =====

    /// Hide or unhide a track; returns whether it is now hidden
    #[wasm_bindgen(js_name = toggleHidden)]
    pub fn toggle_hidden(&mut self, name: &str) -> bool {
        self.hidden.toggle(name)
    }

    /// Whether a track is hidden
    #[wasm_bindgen(js_name = isHidden)]
    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.is_hidden(name)
    }

    /// Flip between visible and hidden tracks; returns the new mode
    #[wasm_bindgen(js_name = toggleViewMode)]
    pub fn toggle_view_mode(&mut self) -> String {
        view_mode_name(self.hidden.toggle_view_mode()).to_string()
    }

    /// Number of hidden tracks
    #[wasm_bindgen(js_name = hiddenCount)]
    pub fn hidden_count(&self) -> usize {
        self.hidden.hidden_count()
    }

    // ===== State Queries =====

    /// Current state as a string
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        match self.inner.state() {
            PlayerState::Idle => "idle",
            PlayerState::Loading => "loading",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
        }
        .to_string()
    }

    /// Current playback rate
    #[wasm_bindgen(js_name = getRate)]
    pub fn get_rate(&self) -> f64 {
        self.inner.rate()
    }

    /// Ordinal of the active track, if any
    #[wasm_bindgen(js_name = activeOrdinal)]
    pub fn active_ordinal(&self) -> Option<usize> {
        self.inner.session().active()
    }

    // ===== Event Callbacks =====

    /// Register controller event callback
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    /// Register media session / wake lock callback
    #[wasm_bindgen(js_name = onPlatform)]
    pub fn on_platform(&mut self, callback: Function) {
        self.platform.set_callback(callback);
    }

    // ===== Internal Helpers =====

    fn after_play(&mut self) -> JsValue {
        self.flush_events();
        let Some(promise) = self.play_promise.borrow_mut().take() else {
            return JsValue::UNDEFINED;
        };
        let Some(token) = self.inner.play_token() else {
            return JsValue::UNDEFINED;
        };

        let pending = Object::new();
        let _ = Reflect::set(&pending, &"promise".into(), &promise);
        let _ = Reflect::set(&pending, &"token".into(), &JsValue::from(token.raw() as f64));
        pending.into()
    }

    fn flush_events(&mut self) {
        let events = self.inner.drain_events();
        if let Some(ref cb) = self.on_event {
            for event in events {
                if let Ok(js_event) = serde_wasm_bindgen::to_value(&event) {
                    cb.call1(&JsValue::NULL, &js_event).ok();
                }
            }
        }
    }

    fn handle_error(&self, error: RepriseError) -> JsValue {
        let err_msg = error.to_string();
        tracing::warn!("{}", err_msg);
        JsValue::from_str(&err_msg)
    }
}

fn view_mode_name(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Visible => "visible",
        ViewMode::Hidden => "hidden",
    }
}
