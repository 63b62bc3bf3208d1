//! Browser adapters for the engine, timer and media session ports

use crate::engine::{MediaEngine, PlayRejected};
use crate::platform::{MediaPlaybackState, MediaSessionPort, WakeLockPort};
use crate::timer::{AutosaveTimer, TimerToken};
use js_sys::{Function, Promise};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsValue;
use web_sys::HtmlMediaElement;

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// `<audio>` element as a media engine
///
/// `play()` returns a promise in browsers. A synchronous failure is reported
/// as a rejection right away; the promise itself is parked in
/// `play_promise` for the glue to attach its rejection handler.
pub struct HtmlMediaEngine {
    element: HtmlMediaElement,
    play_promise: Rc<RefCell<Option<Promise>>>,
}

impl HtmlMediaEngine {
    pub fn new(element: HtmlMediaElement, play_promise: Rc<RefCell<Option<Promise>>>) -> Self {
        Self {
            element,
            play_promise,
        }
    }
}

impl MediaEngine for HtmlMediaEngine {
    fn load(&mut self, source: &str) {
        self.element.set_src(source);
        self.element.load();
    }

    fn play(&mut self) -> Result<(), PlayRejected> {
        match self.element.play() {
            Ok(promise) => {
                *self.play_promise.borrow_mut() = Some(promise);
                Ok(())
            }
            Err(e) => Err(PlayRejected::new(describe(&e))),
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            tracing::warn!("pause() failed: {}", describe(&e));
        }
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, secs: f64) {
        self.element.set_current_time(secs);
    }

    fn duration(&self) -> Option<f64> {
        // NaN until metadata loads, Infinity for streams
        let duration = self.element.duration();
        duration.is_finite().then_some(duration)
    }

    fn playback_rate(&self) -> f64 {
        self.element.playback_rate()
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.element.set_playback_rate(rate);
    }
}

/// Autosave timer driven by JS `setInterval`
///
/// `start` is called as `start(periodMs, token)`, `stop` with no arguments.
/// The glue passes `token` back to `autosaveTick`.
pub struct JsTimer {
    start: Function,
    stop: Function,
}

impl JsTimer {
    pub fn new(start: Function, stop: Function) -> Self {
        Self { start, stop }
    }
}

impl AutosaveTimer for JsTimer {
    fn start(&mut self, period: Duration, token: TimerToken) {
        let period_ms = JsValue::from_f64(period.as_millis() as f64);
        let token = JsValue::from_f64(token.raw() as f64);
        if let Err(e) = self.start.call2(&JsValue::NULL, &period_ms, &token) {
            tracing::warn!("Failed to start autosave timer: {}", describe(&e));
        }
    }

    fn stop(&mut self) {
        if let Err(e) = self.stop.call0(&JsValue::NULL) {
            tracing::warn!("Failed to stop autosave timer: {}", describe(&e));
        }
    }
}

/// Media session and wake lock forwarded to a JS callback
///
/// The callback receives `(kind, payload)` with kinds `metadata`,
/// `playbackState`, `positionState`, `wakeLock`. It can be installed after
/// the controller was built, hence the shared slot.
#[derive(Clone, Default)]
pub struct JsPlatform {
    callback: Rc<RefCell<Option<Function>>>,
}

impl JsPlatform {
    pub fn set_callback(&self, callback: Function) {
        *self.callback.borrow_mut() = Some(callback);
    }

    fn send(&self, kind: &str, payload: &JsValue) {
        if let Some(ref cb) = *self.callback.borrow() {
            cb.call2(&JsValue::NULL, &JsValue::from_str(kind), payload)
                .ok();
        }
    }
}

impl MediaSessionPort for JsPlatform {
    fn set_metadata(&mut self, title: &str) {
        self.send("metadata", &JsValue::from_str(title));
    }

    fn set_playback_state(&mut self, state: MediaPlaybackState) {
        let state = match state {
            MediaPlaybackState::None => "none",
            MediaPlaybackState::Paused => "paused",
            MediaPlaybackState::Playing => "playing",
        };
        self.send("playbackState", &JsValue::from_str(state));
    }

    fn set_position_state(&mut self, position: f64, duration: f64, rate: f64) {
        let payload = js_sys::Array::of3(
            &JsValue::from_f64(position),
            &JsValue::from_f64(duration),
            &JsValue::from_f64(rate),
        );
        self.send("positionState", &payload);
    }
}

impl WakeLockPort for JsPlatform {
    fn acquire(&mut self) {
        self.send("wakeLock", &JsValue::TRUE);
    }

    fn release(&mut self) {
        self.send("wakeLock", &JsValue::FALSE);
    }
}
