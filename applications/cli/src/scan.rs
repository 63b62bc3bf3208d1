//! Folder selection from disk
//!
//! Turns a directory into the same `ImportedFile` list a browser folder
//! picker produces: every file below the folder, with a guessed MIME type.

use reprise_core::ImportedFile;
use std::path::Path;
use walkdir::WalkDir;

/// Collect every file under `folder`, sorted by path
pub fn select_folder(folder: &Path) -> anyhow::Result<Vec<ImportedFile>> {
    if !folder.is_dir() {
        anyhow::bail!("{} is not a directory", folder.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let mut file = ImportedFile::new(name, path.display().to_string());
        if let Some(mime) = mime_guess::from_path(path).first_raw() {
            file = file.with_mime_type(mime);
        }
        files.push(file);
    }

    tracing::debug!("Selected {} files under {}", files.len(), folder.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reprise_playback::TrackRegistry;
    use std::fs;

    #[test]
    fn selection_matches_browser_picker() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("disc2")).unwrap();
        fs::write(dir.path().join("02 Second.mp3"), b"").unwrap();
        fs::write(dir.path().join("01 First.MP3"), b"").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"").unwrap();
        fs::write(dir.path().join("disc2").join("03 Third.mp3"), b"").unwrap();

        let files = select_folder(dir.path()).unwrap();
        assert_eq!(files.len(), 4);

        let registry = TrackRegistry::import(files).unwrap();
        let names: Vec<_> = registry.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["01 First", "02 Second", "03 Third"]);
    }

    #[test]
    fn folder_without_mp3s_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let files = select_folder(dir.path()).unwrap();
        let err = TrackRegistry::import(files).unwrap_err();
        assert_eq!(err.to_string(), "No MP3 files found in the selected folder");
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(select_folder(&dir.path().join("nope")).is_err());
    }
}
