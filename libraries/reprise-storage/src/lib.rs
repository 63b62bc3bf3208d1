//! Reprise Storage
//!
//! Local persistence of per-track progress and the hidden-track set.
//!
//! # Architecture
//!
//! - **Backends**: flat string key-value stores shaped like browser
//!   `localStorage` (memory, JSON file, `localStorage` behind `wasm`)
//! - **Progress slice**: typed, fault-tolerant access on top of a backend
//!
//! # Example
//!
//! ```rust,no_run
//! use reprise_storage::{JsonFileBackend, ProgressStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ProgressStore::new(JsonFileBackend::open("reprise-progress.json")?);
//!
//! if let Some(record) = store.get("Chapter 1") {
//!     println!("resume at {}s", record.current_time_or_zero());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod backend;
mod error;
pub mod progress;

pub use backend::{JsonFileBackend, KeyValueBackend, MemoryBackend, UnavailableBackend};
#[cfg(feature = "wasm")]
pub use backend::LocalStorageBackend;
pub use error::{Result, StorageError};
pub use progress::{ProgressStore, HIDDEN_TRACKS_KEY};
