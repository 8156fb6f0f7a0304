use std::path::Path;

use crate::error::Result;

/// The minimal set of operations the player needs from an audio backend.
///
/// At most one track is loaded at a time. `load` must release whatever was
/// loaded before, even when the new file cannot be opened.
pub trait OutputPort {
    /// Open and decode `path`, leaving it paused at the start.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Start the loaded track.
    fn play(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Stop and release the loaded track.
    fn stop(&mut self);

    /// Volume in percent, 0..=100.
    fn set_volume(&mut self, level: u8);

    /// True once the loaded track has played to its end.
    fn is_finished(&self) -> bool;
}
