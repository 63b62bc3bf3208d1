/// Track domain type
use serde::{Deserialize, Serialize};

/// A track imported from a folder selection
///
/// Tracks live only for the session: they are rebuilt on every import and
/// never persisted. `name` doubles as the progress-store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// File name with the extension stripped
    pub name: String,

    /// Position assigned at import, stable for the session
    pub ordinal: usize,

    /// Opaque handle to the audio bytes (object URL, file path, ...)
    pub source: String,
}

impl Track {
    /// Create a new track
    pub fn new(name: impl Into<String>, ordinal: usize, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal,
            source: source.into(),
        }
    }
}

/// A file-like object handed over by the folder picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedFile {
    /// File name including extension
    pub name: String,

    /// MIME type reported by the platform, if any
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,

    /// Handle used by the media engine to load the bytes
    pub source: String,
}

impl ImportedFile {
    /// Create an imported file without a MIME type
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            source: source.into(),
        }
    }

    /// Attach a MIME type
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Whether this file should be imported as an MP3 track
    ///
    /// Accepts `audio/mpeg` or a `.mp3` extension in any case.
    pub fn is_mp3(&self) -> bool {
        self.mime_type.as_deref() == Some("audio/mpeg")
            || self.name.to_ascii_lowercase().ends_with(".mp3")
    }

    /// File name with its final extension removed
    ///
    /// Dotfiles such as `.mp3` keep their name so the key is never empty.
    pub fn stripped_name(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mp3_detection_is_case_insensitive() {
        assert!(ImportedFile::new("a.mp3", "blob:1").is_mp3());
        assert!(ImportedFile::new("a.MP3", "blob:1").is_mp3());
        assert!(ImportedFile::new("a.Mp3", "blob:1").is_mp3());
        assert!(!ImportedFile::new("a.flac", "blob:1").is_mp3());
        assert!(!ImportedFile::new("mp3", "blob:1").is_mp3());
    }

    #[test]
    fn mime_type_alone_is_enough() {
        let file = ImportedFile::new("podcast.bin", "blob:1").with_mime_type("audio/mpeg");
        assert!(file.is_mp3());

        let other = ImportedFile::new("cover.jpg", "blob:2").with_mime_type("image/jpeg");
        assert!(!other.is_mp3());
    }

    #[test]
    fn stripped_name_removes_final_extension() {
        assert_eq!(ImportedFile::new("Song.mp3", "").stripped_name(), "Song");
        assert_eq!(ImportedFile::new("Song.MP3", "").stripped_name(), "Song");
        assert_eq!(ImportedFile::new("a.b.mp3", "").stripped_name(), "a.b");
        assert_eq!(ImportedFile::new("noext", "").stripped_name(), "noext");
        assert_eq!(ImportedFile::new(".mp3", "").stripped_name(), ".mp3");
    }
}
