//! Reprise - Playback State & Progress Tracking
//!
//! Platform-agnostic playback management for Reprise.
//!
//! This crate provides:
//! - Track registry built from a folder selection
//! - Playback controller (activate, pause/resume, seek, skips, rate)
//! - Listening-time tracking with periodic autosave
//! - Resume-where-you-left-off with the completion-reset rule
//! - Hidden-track list and the rendered list view
//!
//! # Architecture
//!
//! `reprise-playback` never touches a browser or audio device directly:
//! - The media element is a [`MediaEngine`]
//! - The autosave interval is an [`AutosaveTimer`]
//! - The OS media session and wake lock are [`MediaSessionPort`] and
//!   [`WakeLockPort`]
//!
//! Browser implementations live in the `wasm` module (feature `wasm`); the
//! [`simulated`] module provides in-process ones for tests and the CLI.
//!
//! # Example
//!
//! ```rust
//! use reprise_core::{ImportedFile, ManualClock, PlayerConfig};
//! use reprise_playback::simulated::SimulatedEngine;
//! use reprise_playback::{PlaybackController, PlayerState, TrackRegistry};
//! use reprise_storage::ProgressStore;
//!
//! let registry = TrackRegistry::import(vec![ImportedFile::new("Episode 1.mp3", "blob:1")])?;
//! let engine = SimulatedEngine::new();
//! engine.register("blob:1", 1800.0);
//! let clock = ManualClock::new(0);
//!
//! let store = ProgressStore::in_memory();
//! let mut controller =
//!     PlaybackController::new(registry, store.clone(), engine.clone(), PlayerConfig::default())
//!         .with_clock(clock.clone());
//!
//! controller.activate(0)?;
//! assert_eq!(controller.state(), PlayerState::Playing);
//!
//! clock.advance_secs(60.0);
//! engine.advance(60.0);
//! controller.pause();
//!
//! let record = store.get("Episode 1").unwrap();
//! assert_eq!(record.current_time, Some(60.0));
//! assert_eq!(record.total_listening_time, Some(60.0));
//! # Ok::<(), reprise_core::RepriseError>(())
//! ```

mod controller;
mod engine;
mod events;
pub mod format;
mod hidden;
mod platform;
mod registry;
mod session;
pub mod simulated;
mod timer;
mod tracker;
mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use controller::PlaybackController;
pub use engine::{MediaEngine, PlayRejected, PlayToken};
pub use events::PlaybackEvent;
pub use hidden::{HiddenList, ViewMode};
pub use platform::{MediaPlaybackState, MediaSessionPort, NoopPlatform, TransportAction, WakeLockPort};
pub use registry::TrackRegistry;
pub use session::{PlaybackSession, PlayerState};
pub use timer::{AutosaveTimer, NoopTimer, TimerToken};
pub use tracker::SessionTracker;
pub use view::{list_view, TrackListing};
