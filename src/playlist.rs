use crate::error::{LibraryError, Result};
use crate::track::{Track, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Marker value stored under the `"Is MyLibrary Playlist"` meta key; a
/// JSON file without it is not recognised as a catalogue playlist.
const MARKER: &str = "yes";

#[derive(Debug, Serialize, Deserialize)]
struct Meta {
    #[serde(rename = "Is MyLibrary Playlist")]
    marker: String,
    #[serde(rename = "Path")]
    path: PathBuf,
}

/// On-disk document: marker meta block followed by the ordered track list.
#[derive(Debug, Serialize, Deserialize)]
struct PlaylistFile {
    meta: Meta,
    songs: Vec<Track>,
}

/// An ordered, duplicate-free sequence of [`Track`]s with a navigation
/// cursor and an optional backing JSON file.
///
/// No two entries share a resolved location (see [`Track::same_file`]).
/// The cursor is `None` when nothing is selected and otherwise stays
/// within bounds across every mutation. Two playlists are the same
/// catalogue entry when they point at the same backing file; name and
/// contents never enter into identity.
#[derive(Debug, Clone)]
pub struct Playlist {
    name: String,
    tracks: Vec<Track>,
    cursor: Option<usize>,
    /// Backing JSON file; `None` for in-memory-only playlists.
    location: Option<PathBuf>,
}

impl Default for Playlist {
    fn default() -> Self {
        Playlist::new("Unknown")
    }
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Playlist {
            name: name.into(),
            tracks: Vec::new(),
            cursor: None,
            location: None,
        }
    }

    /// Load a playlist from a JSON file, appending the `.json` extension
    /// to `path` first.
    ///
    /// A path that does not resolve to an existing regular file is a hard
    /// `InvalidType` error. Content that fails to parse, lacks the
    /// marker, or carries invalid track records yields `Ok(None)`; a
    /// directory scan is expected to step over such files, not abort.
    pub fn load(path: impl Into<Value>) -> Result<Option<Playlist>> {
        let path = match path.into() {
            Value::Text(s) => PathBuf::from(s),
            Value::Path(p) => p,
            other => {
                return Err(LibraryError::InvalidType(format!(
                    "Playlist.location must be a path or path-convertible string, got {}",
                    other.kind()
                )));
            }
        };
        let path = path.with_extension("json");
        let path = match path.canonicalize() {
            Ok(p) if p.is_file() => p,
            _ => {
                return Err(LibraryError::InvalidType(format!(
                    "no playlist file at {}",
                    path.display()
                )));
            }
        };

        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) => {
                warn!("could not read {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        let doc: PlaylistFile = match serde_json::from_str(&data) {
            Ok(d) => d,
            Err(e) => {
                warn!("not a valid playlist file {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        if doc.meta.marker != MARKER {
            warn!("not a valid playlist file {}", path.display());
            return Ok(None);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut playlist = Playlist::new(name);
        playlist.location = Some(path.clone());
        for track in doc.songs {
            if !track.is_valid() {
                warn!("invalid track record in {}", path.display());
                return Ok(None);
            }
            playlist.add_track(track);
        }

        info!("playlist loaded from {}", path.display());
        Ok(Some(playlist))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing file, or `None` for an in-memory playlist.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub(crate) fn set_location(&mut self, path: PathBuf) {
        self.location = Some(path);
    }

    pub fn set_name(&mut self, value: impl Into<Value>) -> Result<()> {
        match value.into() {
            Value::Text(s) if s.is_empty() => Err(LibraryError::InvalidValue(
                "Playlist.name cannot be an empty string".to_string(),
            )),
            Value::Text(s) => {
                self.name = s;
                Ok(())
            }
            other => Err(LibraryError::InvalidType(format!(
                "Playlist.name must be a string, got {}",
                other.kind()
            ))),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Currently selected index, or `None` when nothing is selected.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Currently selected track, if any.
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|c| self.tracks.get(c))
    }

    /// Whether both playlists are backed by the same file.
    pub fn same_file(&self, other: &Playlist) -> bool {
        self.location == other.location
    }

    /// Whether an equal track (by resolved location) is already present.
    pub fn contains(&self, track: &Track) -> bool {
        self.tracks.iter().any(|t| t.same_file(track))
    }

    /// Append `track` unless an equal one is already present.
    /// Returns whether the playlist grew.
    pub fn add_track(&mut self, track: Track) -> bool {
        if self.contains(&track) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Append every track in order, skipping duplicates silently.
    /// Returns whether at least one track was newly added.
    pub fn add_tracks(&mut self, tracks: impl IntoIterator<Item = Track>) -> bool {
        let mut added = false;
        for track in tracks {
            added |= self.add_track(track);
        }
        added
    }

    /// Delete the track at `index`. An out-of-range index is a no-op
    /// returning `false`. When the removed slot was the one the cursor
    /// pointed past (cursor equal to the new length), the cursor steps
    /// back to stay in bounds.
    pub fn remove_track(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            return false;
        }
        self.tracks.remove(index);
        if let Some(c) = self.cursor {
            if c == self.tracks.len() {
                self.cursor = c.checked_sub(1);
            }
        }
        true
    }

    /// Exchange the tracks at the two positions, leaving the cursor
    /// untouched. Returns `false` without mutating when the indexes are
    /// equal or either is out of range.
    pub fn swap_tracks(&mut self, first: usize, second: usize) -> bool {
        if first == second || first >= self.tracks.len() || second >= self.tracks.len() {
            return false;
        }
        self.tracks.swap(first, second);
        true
    }

    /// Advance the cursor by one, clamped at the last track.
    /// Always returns the resulting cursor.
    pub fn next_track(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return self.cursor;
        }
        self.cursor = Some(match self.cursor {
            None => 0,
            Some(c) => (c + 1).min(self.tracks.len() - 1),
        });
        self.cursor
    }

    /// Retreat the cursor by one; retreating from the first track
    /// deselects. Always returns the resulting cursor.
    pub fn previous_track(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return self.cursor;
        }
        self.cursor = match self.cursor {
            None | Some(0) => None,
            Some(c) => Some(c - 1),
        };
        self.cursor
    }

    /// Pretty form of the summed track durations: minutes and
    /// zero-padded seconds always, an hours prefix only when nonzero.
    pub fn total_duration_pretty(&self) -> String {
        let mut total: u64 = self.tracks.iter().map(|t| t.duration_secs()).sum();
        let mut out = String::new();
        let hours = total / 3600;
        if hours > 0 {
            out.push_str(&format!("{hours}:"));
            total %= 3600;
        }
        out.push_str(&(total / 60).to_string());
        out.push_str(&format!(":{:02}", total % 60));
        out
    }

    /// Write the playlist into `directory` as
    /// `<name-with-spaces-as-hyphens>.json`, creating the directory and
    /// its parents as needed. Returns the written file path; the
    /// playlist's own `location` is left untouched.
    pub fn save(&self, directory: impl Into<Value>) -> Result<PathBuf> {
        let dir = match directory.into() {
            Value::Text(s) => PathBuf::from(s),
            Value::Path(p) => p,
            other => {
                return Err(LibraryError::InvalidType(format!(
                    "Playlist.save expects a directory path, got {}",
                    other.kind()
                )));
            }
        };
        fs::create_dir_all(&dir)?;
        let dir = dir.canonicalize()?;
        let path = dir.join(format!("{}.json", self.name.replace(' ', "-")));

        let doc = PlaylistFile {
            meta: Meta {
                marker: MARKER.to_string(),
                path: path.clone(),
            },
            songs: self.tracks.clone(),
        };
        info!("saving playlist to {}", path.display());
        fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        Ok(path)
    }

    /// Single-pass borrowing iterator over the tracks.
    pub fn iter(&self) -> PlaylistIter<'_> {
        PlaylistIter {
            tracks: &self.tracks,
            index: 0,
        }
    }
}

/// Borrowing iterator over a playlist's track sequence.
///
/// Holds a shared borrow of the sequence, so the playlist cannot be
/// structurally mutated while an iterator is alive. Single pass; build a
/// new one to iterate again.
pub struct PlaylistIter<'a> {
    tracks: &'a [Track],
    index: usize,
}

impl<'a> Iterator for PlaylistIter<'a> {
    type Item = &'a Track;

    fn next(&mut self) -> Option<Self::Item> {
        let track = self.tracks.get(self.index)?;
        self.index += 1;
        Some(track)
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Track;
    type IntoIter = PlaylistIter<'a>;

    fn into_iter(self) -> PlaylistIter<'a> {
        self.iter()
    }
}
