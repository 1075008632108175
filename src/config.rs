//! Directory configuration for the catalogue.
//!
//! Paths are passed in explicitly at construction time; nothing in the
//! core reads environment variables or other ambient process state.

use std::path::PathBuf;

/// Filesystem layout the catalogue works against.
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    /// Directory scanned for audio files.
    pub songs_dir: PathBuf,
    /// Directory where playlist JSON files are kept.
    pub playlists_dir: PathBuf,
}

impl LibraryPaths {
    pub fn new(songs_dir: impl Into<PathBuf>, playlists_dir: impl Into<PathBuf>) -> Self {
        LibraryPaths {
            songs_dir: songs_dir.into(),
            playlists_dir: playlists_dir.into(),
        }
    }

    /// Default locations under the user's audio and data directories,
    /// falling back to `./data` when the platform reports neither.
    pub fn default_dirs() -> Self {
        let songs = dirs::audio_dir()
            .unwrap_or_else(|| PathBuf::from("./data"))
            .join("mylibrary/songs");
        let playlists = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("./data"))
            .join("mylibrary/playlists");
        LibraryPaths::new(songs, playlists)
    }
}
