use crate::error::{LibraryError, Result};
use crate::tags;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Loosely typed input accepted by [`Track`] setters.
///
/// Callers at the presentation boundary hand over values that may arrive
/// as text, numbers, or paths; funnelling them through this enum lets each
/// setter check the kind it got before validating the value itself.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Path(PathBuf),
}

impl Value {
    /// Human-readable kind name, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Path(_) => "path",
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&Path> for Value {
    fn from(v: &Path) -> Self {
        Value::Path(v.to_path_buf())
    }
}

impl From<PathBuf> for Value {
    fn from(v: PathBuf) -> Self {
        Value::Path(v)
    }
}

/// Canonical hours/minutes/seconds decomposition of a track duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackDuration {
    hours: u64,
    minutes: u8,
    seconds: u8,
}

impl TrackDuration {
    pub fn from_secs(total: u64) -> Self {
        TrackDuration {
            hours: total / 3600,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
        }
    }

    pub fn as_secs(&self) -> u64 {
        self.hours * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn hours(&self) -> u64 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }
}

/// A validated metadata record plus the filesystem location of the audio
/// file it describes. Holds no audio data.
///
/// `title`, `artist`, and `album` are always non-empty; `location`, once
/// assigned through a setter or factory, named an existing regular file at
/// the moment of assignment. Two tracks count as the same catalogue entry
/// when [`Track::same_file`] holds; metadata never enters into identity.
///
/// The serialized form is exactly one entry of the playlist file's
/// `songs` array; records parsed back from disk are re-validated by
/// `Playlist::load`, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    title: String,
    artist: String,
    album: String,
    #[serde(rename = "length", with = "length_serde")]
    duration: TrackDuration,
    #[serde(rename = "path")]
    location: PathBuf,
}

impl Default for Track {
    fn default() -> Self {
        Track {
            title: "Unknown".to_string(),
            artist: "Unknown".to_string(),
            album: "Unknown".to_string(),
            duration: TrackDuration::default(),
            location: PathBuf::new(),
        }
    }
}

impl Track {
    /// Build a Track by reading metadata from an audio file.
    ///
    /// Fails with `InvalidType` unless `path` is text or a path value,
    /// and with `InvalidValue` unless it resolves to an existing regular
    /// file. A file that exists but cannot be decoded as audio yields
    /// `Ok(None)`; discovery callers skip those silently.
    pub fn load(path: impl Into<Value>) -> Result<Option<Track>> {
        let path = path_field(path, "Track.location")?;
        let path = path.canonicalize().map_err(|_| {
            LibraryError::InvalidValue(format!(
                "Track.location must name an existing file: {}",
                path.display()
            ))
        })?;
        if !path.is_file() {
            return Err(LibraryError::InvalidValue(format!(
                "Track.location must name a regular file: {}",
                path.display()
            )));
        }

        let Some(data) = tags::read(&path) else {
            return Ok(None);
        };

        let mut track = Track::default();
        match data.title {
            Some(title) => track.set_title(title)?,
            None => {
                if let Some(stem) = path.file_stem() {
                    track.set_title(stem.to_string_lossy().to_string())?;
                }
            }
        }
        if let Some(artist) = data.artist {
            track.set_artist(artist)?;
        }
        if let Some(album) = data.album {
            track.set_album(album)?;
        }
        if track.duration_secs() == 0 {
            track.set_duration(data.length_secs as i64)?;
        }
        track.set_location(path.as_path())?;

        info!("audio file loaded: {}", track.location().display());
        Ok(Some(track))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    /// Resolved location of the audio file; empty until assigned.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Total duration in whole seconds.
    pub fn duration_secs(&self) -> u64 {
        self.duration.as_secs()
    }

    /// Whether both tracks point at the same resolved file.
    ///
    /// This is the only identity the catalogue recognises; it governs
    /// uniqueness inside a playlist.
    pub fn same_file(&self, other: &Track) -> bool {
        self.location == other.location
    }

    pub fn set_title(&mut self, value: impl Into<Value>) -> Result<()> {
        self.title = text_field(value, "Track.title")?;
        Ok(())
    }

    pub fn set_artist(&mut self, value: impl Into<Value>) -> Result<()> {
        self.artist = text_field(value, "Track.artist")?;
        Ok(())
    }

    pub fn set_album(&mut self, value: impl Into<Value>) -> Result<()> {
        self.album = text_field(value, "Track.album")?;
        Ok(())
    }

    /// Assign the duration from a count of seconds.
    ///
    /// Accepts integer, float, or numeric text; the parsed value is
    /// truncated toward zero. Booleans are rejected as `InvalidType`
    /// before any numeric handling, and negative values as
    /// `InvalidValue`.
    pub fn set_duration(&mut self, value: impl Into<Value>) -> Result<()> {
        let secs = match value.into() {
            Value::Bool(_) => {
                return Err(LibraryError::InvalidType(
                    "Track.duration must be a number of seconds, not a boolean".to_string(),
                ));
            }
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
            Value::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                LibraryError::InvalidType(format!("Track.duration must be numeric, got {s:?}"))
            })?,
            other => {
                return Err(LibraryError::InvalidType(format!(
                    "Track.duration must be a number of seconds, got {}",
                    other.kind()
                )));
            }
        };
        if secs < 0.0 {
            return Err(LibraryError::InvalidValue(
                "Track.duration cannot be negative".to_string(),
            ));
        }
        self.duration = TrackDuration::from_secs(secs as u64);
        Ok(())
    }

    /// Assign the location from text or a path value.
    ///
    /// The path is resolved to an absolute form and must name an existing
    /// regular file at that moment; it is not re-checked afterward.
    pub fn set_location(&mut self, value: impl Into<Value>) -> Result<()> {
        let path = path_field(value, "Track.location")?;
        let resolved = path.canonicalize().map_err(|_| {
            LibraryError::InvalidValue(format!(
                "Track.location must name an existing file: {}",
                path.display()
            ))
        })?;
        if !resolved.is_file() {
            return Err(LibraryError::InvalidValue(format!(
                "Track.location must name a regular file: {}",
                resolved.display()
            )));
        }
        self.location = resolved;
        Ok(())
    }

    /// Positional pretty form of the duration.
    ///
    /// Each switch appends its component: hours as `"H:"` (unpadded),
    /// minutes zero-padded to two digits with no separator of their own,
    /// seconds as `":SS"`. With no switch set, the unpadded full form
    /// `"H:M:S"` is returned.
    pub fn duration_pretty(&self, hours: bool, minutes: bool, seconds: bool) -> String {
        let d = self.duration;
        let mut out = String::new();
        if hours {
            out.push_str(&format!("{}:", d.hours()));
        }
        if minutes {
            out.push_str(&format!("{:02}", d.minutes()));
        }
        if seconds {
            out.push_str(&format!(":{:02}", d.seconds()));
        }
        if out.is_empty() {
            out = format!("{}:{}:{}", d.hours(), d.minutes(), d.seconds());
        }
        out
    }

    /// Field invariants hold; used to vet records parsed from playlist
    /// files, which bypass the setters.
    pub(crate) fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.artist.is_empty() && !self.album.is_empty()
    }
}

fn text_field(value: impl Into<Value>, field: &str) -> Result<String> {
    match value.into() {
        Value::Text(s) if s.is_empty() => Err(LibraryError::InvalidValue(format!(
            "{field} cannot be an empty string"
        ))),
        Value::Text(s) => Ok(s),
        other => Err(LibraryError::InvalidType(format!(
            "{field} must be a string, got {}",
            other.kind()
        ))),
    }
}

fn path_field(value: impl Into<Value>, field: &str) -> Result<PathBuf> {
    match value.into() {
        Value::Text(s) => Ok(PathBuf::from(s)),
        Value::Path(p) => Ok(p),
        other => Err(LibraryError::InvalidType(format!(
            "{field} must be a path or path-convertible string, got {}",
            other.kind()
        ))),
    }
}

mod length_serde {
    use super::TrackDuration;
    use serde::{Deserialize, Deserializer, Serializer};

    // The playlist schema stores the length as seconds-in-text.
    pub fn serialize<S: Serializer>(d: &TrackDuration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&d.as_secs().to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TrackDuration, D::Error> {
        let raw = String::deserialize(d)?;
        let secs = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric length {raw:?}")))?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom(format!("bad length {raw:?}")));
        }
        Ok(TrackDuration::from_secs(secs as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn track_with_secs(secs: u64) -> Track {
        let mut track = Track::default();
        track.set_duration(secs as i64).unwrap();
        track
    }

    #[test]
    fn defaults_are_unknown() {
        let track = Track::default();
        assert_eq!(track.title(), "Unknown");
        assert_eq!(track.artist(), "Unknown");
        assert_eq!(track.album(), "Unknown");
        assert_eq!(track.duration_secs(), 0);
        assert_eq!(track.location(), Path::new(""));
    }

    #[test]
    fn text_setters_accept_non_empty_strings() {
        let mut track = Track::default();
        track.set_title("Comfortably Numb").unwrap();
        track.set_artist("Pink Floyd").unwrap();
        track.set_album("The Wall").unwrap();
        assert_eq!(track.title(), "Comfortably Numb");
        assert_eq!(track.artist(), "Pink Floyd");
        assert_eq!(track.album(), "The Wall");
    }

    #[test]
    fn text_setters_reject_empty_and_wrong_kind() {
        let mut track = Track::default();
        assert!(track.set_title("").unwrap_err().is_invalid_value());
        assert!(track.set_artist("").unwrap_err().is_invalid_value());
        assert!(track.set_album("").unwrap_err().is_invalid_value());
        assert!(track.set_title(5).unwrap_err().is_invalid_type());
        assert!(track.set_artist(1.5).unwrap_err().is_invalid_type());
        assert!(track.set_album(true).unwrap_err().is_invalid_type());
    }

    #[test]
    fn set_duration_accepts_int_float_and_text() {
        let mut track = Track::default();
        track.set_duration(221).unwrap();
        assert_eq!(track.duration_secs(), 221);
        track.set_duration(19.8).unwrap();
        assert_eq!(track.duration_secs(), 19); // truncated toward zero
        track.set_duration("5.14").unwrap();
        assert_eq!(track.duration_secs(), 5);
        track.set_duration("180").unwrap();
        assert_eq!(track.duration_secs(), 180);
    }

    #[test]
    fn set_duration_rejects_negatives_as_invalid_value() {
        let mut track = Track::default();
        assert!(track.set_duration(-16).unwrap_err().is_invalid_value());
        assert!(track.set_duration(-19.8).unwrap_err().is_invalid_value());
        assert!(track.set_duration("-3").unwrap_err().is_invalid_value());
    }

    #[test]
    fn set_duration_rejects_booleans_as_invalid_type() {
        let mut track = Track::default();
        assert!(track.set_duration(true).unwrap_err().is_invalid_type());
        assert!(track.set_duration(false).unwrap_err().is_invalid_type());
    }

    #[test]
    fn set_duration_rejects_non_numeric_text() {
        let mut track = Track::default();
        assert!(track.set_duration("abc").unwrap_err().is_invalid_type());
    }

    #[test]
    fn duration_pretty_formats_180_seconds() {
        let track = track_with_secs(180);
        assert_eq!(track.duration_pretty(true, true, true), "0:03:00");
        assert_eq!(track.duration_pretty(false, true, true), "03:00");
        assert_eq!(track.duration_pretty(false, false, true), ":00");
        assert_eq!(track.duration_pretty(false, true, false), "03");
        assert_eq!(track.duration_pretty(true, false, false), "0:");
        assert_eq!(track.duration_pretty(false, false, false), "0:3:0");
    }

    #[test]
    fn duration_pretty_formats_221_seconds() {
        let track = track_with_secs(221);
        assert_eq!(track.duration_pretty(true, true, true), "0:03:41");
        assert_eq!(track.duration_pretty(false, true, true), "03:41");
    }

    #[test]
    fn duration_pretty_formats_4502_seconds() {
        let track = track_with_secs(4502);
        assert_eq!(track.duration_pretty(true, true, true), "1:15:02");
        assert_eq!(track.duration_pretty(false, true, false), "15");
        assert_eq!(track.duration_pretty(true, false, false), "1:");
    }

    #[test]
    fn set_location_requires_an_existing_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        fs::write(&file, b"junk").unwrap();

        let mut track = Track::default();
        track.set_location(file.as_path()).unwrap();
        assert!(track.location().is_absolute());
        assert!(track.location().ends_with("song.mp3"));

        let err = track
            .set_location(dir.path().join("missing.mp3").as_path())
            .unwrap_err();
        assert!(err.is_invalid_value());

        // a directory is not a regular file
        assert!(track.set_location(dir.path()).unwrap_err().is_invalid_value());

        // wrong kind entirely
        assert!(track.set_location(7).unwrap_err().is_invalid_type());
    }

    #[test]
    fn same_file_ignores_metadata() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mp3");
        let other = dir.path().join("b.mp3");
        fs::write(&file, b"junk").unwrap();
        fs::write(&other, b"junk").unwrap();

        let mut first = Track::default();
        first.set_title("One").unwrap();
        first.set_location(file.as_path()).unwrap();

        let mut second = Track::default();
        second.set_title("Two").unwrap();
        second.set_artist("Somebody Else").unwrap();
        second.set_location(file.as_path()).unwrap();

        assert!(first.same_file(&second));

        second.set_location(other.as_path()).unwrap();
        assert!(!first.same_file(&second));
    }

    #[test]
    fn load_rejects_missing_file() {
        let err = Track::load("__does_not_exist__.mp3").unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn load_rejects_directory() {
        let dir = tempdir().unwrap();
        let err = Track::load(dir.path()).unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn load_returns_none_for_undecodable_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("noise.mp3");
        fs::write(&file, b"not a real mp3").unwrap();
        assert!(Track::load(file.as_path()).unwrap().is_none());
    }

    #[test]
    fn serialized_record_uses_schema_field_names() {
        let mut track = track_with_secs(185);
        track.set_title("Test").unwrap();
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["title"], "Test");
        assert_eq!(json["length"], "185");
        assert!(json.get("path").is_some());
        assert!(json.get("duration").is_none());
    }

    #[test]
    fn record_round_trips_through_json() {
        let mut track = track_with_secs(4502);
        track.set_title("Long One").unwrap();
        let json = serde_json::to_string(&track).unwrap();
        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title(), "Long One");
        assert_eq!(back.duration_secs(), 4502);
    }
}
