//! Catalogue session: the synthetic all-tracks playlist plus the
//! playlists saved on disk, behind one aggregate with explicit paths.

use crate::config::LibraryPaths;
use crate::crawler;
use crate::error::{LibraryError, Result};
use crate::playlist::Playlist;
use crate::track::Track;
use std::fs;
use std::path::Path;
use tracing::info;

/// Reserved name of the in-memory playlist holding every discovered track.
pub const ALL_TRACKS_NAME: &str = "--all-tracks--";

/// A catalogue session over one songs directory and one playlists
/// directory.
///
/// Both directories are scanned once, at [`Library::open`] time; tracks
/// added to the songs directory afterwards only show up through
/// [`Library::import_track`] or a fresh session.
#[derive(Debug)]
pub struct Library {
    paths: LibraryPaths,
    all_tracks: Playlist,
    playlist_names: Vec<String>,
}

impl Library {
    /// Scan the configured directories and build the session.
    pub fn open(paths: LibraryPaths) -> Self {
        let mut all_tracks = Playlist::new(ALL_TRACKS_NAME);
        all_tracks.add_tracks(crawler::find_tracks(&paths.songs_dir, None));

        let mut playlist_names = vec![ALL_TRACKS_NAME.to_string()];
        playlist_names.extend(
            crawler::find_playlists(&paths.playlists_dir)
                .iter()
                .map(|p| p.name().to_string()),
        );

        info!(
            "catalogue opened: {} track(s), {} playlist(s)",
            all_tracks.len(),
            playlist_names.len()
        );
        Library {
            paths,
            all_tracks,
            playlist_names,
        }
    }

    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    /// The synthetic playlist of every track in the songs directory.
    pub fn all_tracks(&self) -> &Playlist {
        &self.all_tracks
    }

    /// Names of the known playlists, the all-tracks name first.
    pub fn playlist_names(&self) -> &[String] {
        &self.playlist_names
    }

    /// Create and persist a new, empty playlist.
    ///
    /// Returns `Ok(None)` when a playlist with that name already exists;
    /// the returned playlist carries the backing file it was written to.
    pub fn create_playlist(&mut self, name: &str) -> Result<Option<Playlist>> {
        if self.playlist_names.iter().any(|n| n == name) {
            return Ok(None);
        }
        let mut playlist = Playlist::default();
        playlist.set_name(name)?;
        let path = playlist.save(self.paths.playlists_dir.as_path())?;
        playlist.set_location(path);
        self.playlist_names.push(name.to_string());
        Ok(Some(playlist))
    }

    /// Fetch a playlist by name: the all-tracks playlist for its reserved
    /// name, otherwise the saved playlist file of that name.
    pub fn open_playlist(&self, name: &str) -> Result<Option<Playlist>> {
        if name == ALL_TRACKS_NAME {
            return Ok(Some(self.all_tracks.clone()));
        }
        let file = self.paths.playlists_dir.join(name.replace(' ', "-"));
        Playlist::load(file.as_path())
    }

    /// Delete a saved playlist's backing file and forget its name.
    /// In-memory playlists have no backing file and are refused.
    pub fn delete_playlist(&mut self, playlist: &Playlist) -> Result<bool> {
        let Some(path) = playlist.location() else {
            return Ok(false);
        };
        info!("deleting playlist file {}", path.display());
        fs::remove_file(path)?;
        self.playlist_names.retain(|n| n != playlist.name());
        Ok(true)
    }

    /// Copy an audio file into the songs directory and register it in the
    /// all-tracks playlist.
    ///
    /// When the copy cannot be decoded it is removed again and `false`
    /// comes back; the songs directory only ever accumulates files the
    /// catalogue could actually read.
    pub fn import_track(&mut self, source: &Path) -> Result<bool> {
        let file_name = source.file_name().ok_or_else(|| {
            LibraryError::InvalidValue(format!("not a file path: {}", source.display()))
        })?;
        fs::create_dir_all(&self.paths.songs_dir)?;
        let dest = self.paths.songs_dir.join(file_name);
        fs::copy(source, &dest)?;

        match Track::load(dest.as_path())? {
            Some(track) => {
                info!("imported {}", dest.display());
                Ok(self.all_tracks.add_track(track))
            }
            None => {
                fs::remove_file(&dest)?;
                Ok(false)
            }
        }
    }
}
