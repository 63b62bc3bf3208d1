//! Reprise Core
//!
//! Platform-agnostic types, ports, and error handling shared by every Reprise
//! crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `ProgressRecord`, `HiddenSet`
//! - **Ports**: `Clock` (wall-clock source, swappable in tests)
//! - **Configuration**: `PlayerConfig` and its loader
//! - **Error Handling**: Unified `RepriseError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use reprise_core::ProgressRecord;
//!
//! let mut record = ProgressRecord::default();
//! record.mark_started(1_700_000_000_000);
//! record.commit_position(45.0, 200.0, 30.0);
//!
//! assert_eq!(record.current_time, Some(45.0));
//! assert_eq!(record.first_listened, Some(1_700_000_000_000));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::PlayerConfig;
pub use error::{RepriseError, Result};
pub use traits::{Clock, ManualClock, SystemClock};
pub use types::{position_to_save, HiddenSet, ImportedFile, ProgressRecord, Track};
