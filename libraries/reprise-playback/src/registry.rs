//! Track registry
//!
//! Ordered, session-scoped list of playable tracks built from a folder
//! selection.

use reprise_core::{ImportedFile, RepriseError, Result, Track};
use std::collections::HashSet;

/// Tracks of the current folder selection, in import order
#[derive(Debug, Clone, Default)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
}

impl TrackRegistry {
    /// Build a registry from a folder selection
    ///
    /// Keeps MP3 files only, strips extensions and numbers the survivors in
    /// input order. Fails with [`RepriseError::NoMatchingFiles`] when nothing
    /// survives the filter.
    pub fn import<I>(files: I) -> Result<Self>
    where
        I: IntoIterator<Item = ImportedFile>,
    {
        let mut seen = HashSet::new();
        let tracks: Vec<Track> = files
            .into_iter()
            .filter(ImportedFile::is_mp3)
            .enumerate()
            .map(|(ordinal, file)| {
                let name = file.stripped_name().to_string();
                if !seen.insert(name.clone()) {
                    tracing::warn!(
                        "Track name '{}' appears more than once; progress will be shared",
                        name
                    );
                }
                Track::new(name, ordinal, file.source)
            })
            .collect();

        if tracks.is_empty() {
            return Err(RepriseError::NoMatchingFiles);
        }

        tracing::info!("Imported {} tracks", tracks.len());
        Ok(Self { tracks })
    }

    /// Track at `ordinal`
    pub fn get(&self, ordinal: usize) -> Option<&Track> {
        self.tracks.get(ordinal)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks in import order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Ordinal of the first track called `name`
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> ImportedFile {
        ImportedFile::new(name, format!("blob:{}", name))
    }

    #[test]
    fn filters_and_numbers_mp3s() {
        let registry = TrackRegistry::import(vec![
            file("cover.jpg"),
            file("01 Intro.mp3"),
            file("notes.txt"),
            file("02 Theme.MP3"),
            ImportedFile::new("voice memo", "blob:3").with_mime_type("audio/mpeg"),
        ])
        .unwrap();

        let names: Vec<_> = registry.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["01 Intro", "02 Theme", "voice memo"]);

        let ordinals: Vec<_> = registry.iter().map(|t| t.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(registry.get(1).unwrap().source, "blob:02 Theme.MP3");
    }

    #[test]
    fn empty_selection_is_rejected() {
        let result = TrackRegistry::import(vec![file("cover.jpg")]);
        assert!(matches!(result, Err(RepriseError::NoMatchingFiles)));

        let result = TrackRegistry::import(Vec::new());
        assert!(matches!(result, Err(RepriseError::NoMatchingFiles)));
    }

    #[test]
    fn duplicate_stems_are_kept() {
        let registry = TrackRegistry::import(vec![
            ImportedFile::new("song.mp3", "blob:a"),
            ImportedFile::new("song.mp3", "blob:b"),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).unwrap().name, "song");
        assert_eq!(registry.position_of("song"), Some(0));
    }
}
