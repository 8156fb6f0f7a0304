use crate::library::Track;

/// Transport status of the output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The single owned record of what is playing.
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub current: Option<Track>,
    pub status: PlaybackStatus,
    /// 0..=100
    pub volume: u8,
    pub shuffle: bool,
    /// Play-order position of the last track played from the play order.
    /// Queue playback leaves it untouched.
    pub cursor: Option<usize>,
}

impl PlaybackState {
    pub fn new(volume: u8) -> Self {
        Self {
            volume: volume.min(100),
            ..Self::default()
        }
    }
}
