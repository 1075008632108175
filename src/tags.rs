//! Audio metadata extraction.
//!
//! Thin wrapper around lofty so the rest of the crate treats tag reading
//! as an opaque service: a path in, either tag data or nothing out.

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// Tag fields reported for a single audio file.
///
/// Text entries are trimmed; empty entries are dropped rather than
/// reported as empty strings.
#[derive(Debug, Default)]
pub struct TagData {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Reported duration of the audio stream, in whole seconds.
    pub length_secs: u64,
}

/// Read tag data from `path`, or `None` when the file cannot be decoded
/// as a supported audio format.
pub fn read(path: &Path) -> Option<TagData> {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!("could not decode {}: {}", path.display(), e);
            return None;
        }
    };

    let mut data = TagData {
        length_secs: tagged.properties().duration().as_secs(),
        ..TagData::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        data.title = clean(tag.title());
        data.artist = clean(tag.artist());
        data.album = clean(tag.album());
    }

    Some(data)
}

fn clean(value: Option<Cow<'_, str>>) -> Option<String> {
    value.and_then(|v| {
        let v = v.trim();
        (!v.is_empty()).then(|| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn read_returns_none_for_garbage_bytes() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("noise.mp3");
        fs::write(&file, b"definitely not audio").unwrap();
        assert!(read(&file).is_none());
    }

    #[test]
    fn read_returns_none_for_missing_file() {
        assert!(read(Path::new("__nope__.mp3")).is_none());
    }

    #[test]
    fn clean_trims_and_drops_empty() {
        assert_eq!(clean(Some(Cow::from("  hello  "))), Some("hello".to_string()));
        assert_eq!(clean(Some(Cow::from("   "))), None);
        assert_eq!(clean(None), None);
    }
}
