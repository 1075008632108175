//! MyLibrary — core library for a personal audio-track catalogue.
//!
//! Tracks with validated metadata, playlists with a navigation cursor and
//! JSON persistence, and directory discovery that builds both from files
//! on disk. Presentation layers consume this crate; no audio decoding or
//! playback happens here.

pub mod config;
pub mod crawler;
pub mod error;
pub mod library;
pub mod playlist;
pub mod tags;
pub mod track;
