//! Error types shared by the catalog, the output port and the controller.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while browsing or playing.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Out-of-range selection, unknown command or malformed path.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Folder or track missing (e.g. removed mid-session).
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The decoder does not understand the file.
    #[error("unsupported format: {} ({reason})", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// The file could not be opened or read.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A track failed to start; reported, then skipped.
    #[error("could not play {}: {reason}", path.display())]
    Playback { path: PathBuf, reason: String },

    /// No usable audio device at startup.
    #[error("no audio output device: {0}")]
    NoAudioDevice(String),

    #[error("config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("failed to save config: {0}")]
    ConfigSave(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
