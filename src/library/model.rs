use std::path::PathBuf;
use std::time::Duration;

/// One playable file as seen by the player. Never mutated after a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    /// Position inside the folder listing it came from.
    pub index: usize,
    pub display: String,
}

impl Track {
    /// Two descriptors name the same track when they share a path.
    pub fn same_file(&self, other: &Track) -> bool {
        self.path == other.path
    }
}
