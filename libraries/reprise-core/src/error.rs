/// Core error types for Reprise
use thiserror::Error;

/// Result type alias using `RepriseError`
pub type Result<T> = std::result::Result<T, RepriseError>;

/// Core error type for Reprise
///
/// None of these are fatal to the player. Each has a defined fallback:
/// playback falls back to paused, storage degrades to "no memory", and
/// time-based operations become no-ops.
#[derive(Error, Debug)]
pub enum RepriseError {
    /// The media engine refused to start or resume (autoplay policy, etc.)
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// Persistence read/write failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A folder selection contained no playable files
    #[error("No MP3 files found in the selected folder")]
    NoMatchingFiles,

    /// Media metadata has not loaded yet, so the duration is unknown
    #[error("Track duration is not known yet")]
    UnknownDuration,

    /// Track ordinal outside the current registry
    #[error("Track index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RepriseError {
    /// Create a playback rejected error
    pub fn playback_rejected(msg: impl Into<String>) -> Self {
        Self::PlaybackRejected(msg.into())
    }

    /// Create a storage unavailable error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<::config::ConfigError> for RepriseError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
