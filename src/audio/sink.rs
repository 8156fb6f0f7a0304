//! Utilities for creating `rodio` sinks from files on disk.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink`, turning every failure into a `PlayerError`.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use crate::error::{PlayerError, Result};

/// Create a paused `Sink` for the file at `path`.
pub(super) fn create_sink(handle: &OutputStream, path: &Path) -> Result<Sink> {
    let file = File::open(path).map_err(|source| open_error(path, source))?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| PlayerError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

pub(super) fn open_error(path: &Path, source: std::io::Error) -> PlayerError {
    if source.kind() == ErrorKind::NotFound {
        PlayerError::NotFound(path.to_path_buf())
    } else {
        PlayerError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Map a 0..=100 volume onto rodio's linear gain.
pub(super) fn gain(level: u8) -> f32 {
    f32::from(level.min(100)) / 100.0
}
