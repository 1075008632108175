//! Directory discovery: materialize tracks and playlists from the direct
//! children of a directory. Scans are best-effort: unreadable entries
//! and undecodable files are stepped over, never raised.

use crate::playlist::Playlist;
use crate::track::Track;
use std::fs;
use std::path::Path;
use tracing::{error, warn};

/// Audio file extensions the catalogue can ingest.
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3"];

fn has_extension(path: &Path, wanted: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| wanted.iter().any(|w| w.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Scan the direct children of `directory` and build a [`Track`] for
/// every matching audio file that decodes, in directory-listing order.
///
/// `extension` narrows the scan to one supported extension; an
/// unsupported value is logged and the full supported set is used
/// instead. A missing or non-directory path yields an empty list.
pub fn find_tracks(directory: &Path, extension: Option<&str>) -> Vec<Track> {
    let mut found = Vec::new();
    if !directory.is_dir() {
        return found;
    }

    let wanted: Vec<&str> = match extension {
        None => SUPPORTED_EXTENSIONS.to_vec(),
        Some(ext) => {
            let ext = ext.trim_start_matches('.');
            match SUPPORTED_EXTENSIONS
                .iter()
                .find(|s| s.eq_ignore_ascii_case(ext))
            {
                Some(supported) => vec![*supported],
                None => {
                    error!("unsupported file type: {ext}");
                    SUPPORTED_EXTENSIONS.to_vec()
                }
            }
        }
    };

    let entries = match fs::read_dir(directory) {
        Ok(e) => e,
        Err(e) => {
            error!("could not read directory {}: {}", directory.display(), e);
            return found;
        }
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !has_extension(&path, &wanted) {
            continue;
        }
        match Track::load(path.as_path()) {
            Ok(Some(track)) => found.push(track),
            Ok(None) => {} // undecodable, skip
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }
    found
}

/// Scan the direct children of `directory` for catalogue playlist files.
///
/// Every `.json` child goes through [`Playlist::load`]; files that yield
/// no playlist or an empty name are discarded. An invalid directory is
/// logged and yields an empty list.
pub fn find_playlists(directory: &Path) -> Vec<Playlist> {
    let mut found = Vec::new();
    if !directory.is_dir() {
        error!("could not open directory {}", directory.display());
        return found;
    }

    let entries = match fs::read_dir(directory) {
        Ok(e) => e,
        Err(e) => {
            error!("could not read directory {}: {}", directory.display(), e);
            return found;
        }
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !has_extension(&path, &["json"]) {
            continue;
        }
        match Playlist::load(path.as_path()) {
            Ok(Some(playlist)) if !playlist.name().is_empty() => found.push(playlist),
            Ok(_) => {}
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::Playlist;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn find_tracks_returns_empty_for_invalid_directory() {
        assert!(find_tracks(Path::new("__nowhere__"), None).is_empty());

        let dir = tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        fs::write(&file, b"junk").unwrap();
        assert!(find_tracks(&file, None).is_empty());
    }

    #[test]
    fn find_tracks_skips_undecodable_files_silently() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"not audio").unwrap();
        fs::write(dir.path().join("b.MP3"), b"also not audio").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.mp3"), b"not scanned").unwrap();

        // both candidates fail to decode, so nothing comes back, and
        // nothing raises either
        assert!(find_tracks(dir.path(), None).is_empty());
    }

    #[test]
    fn find_tracks_with_unsupported_extension_falls_back() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.ogg"), b"junk").unwrap();
        assert!(find_tracks(dir.path(), Some(".ogg")).is_empty());
        assert!(find_tracks(dir.path(), Some("mp3")).is_empty());
    }

    #[test]
    fn find_playlists_keeps_only_valid_catalogue_files() {
        let dir = tempdir().unwrap();

        Playlist::new("Good One").save(dir.path()).unwrap();
        fs::write(dir.path().join("broken.json"), b"{ not json").unwrap();
        fs::write(
            dir.path().join("foreign.json"),
            r#"{"meta": {}, "songs": []}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignore").unwrap();

        let playlists = find_playlists(dir.path());
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].name(), "Good-One");
    }

    #[test]
    fn find_playlists_returns_empty_for_invalid_directory() {
        assert!(find_playlists(Path::new("__nowhere__")).is_empty());
    }
}
