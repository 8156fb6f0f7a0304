use std::fs;
use std::path::{Path, PathBuf};

use crate::audio::OutputPort;
use crate::config;
use crate::player::Controller;

/// The first command-line argument wins over the configured folder.
pub fn resolve_music_folder(arg: Option<String>, settings: &config::Settings) -> PathBuf {
    arg.map(PathBuf::from)
        .unwrap_or_else(|| settings.library.music_folder.clone())
}

pub fn apply_playback_defaults<P: OutputPort>(
    controller: &mut Controller<P>,
    settings: &config::Settings,
) {
    if settings.playback.shuffle && !controller.state().shuffle {
        controller.toggle_shuffle();
    }
}

/// The folder, volume and shuffle state written back on quit.
pub fn session<P: OutputPort>(controller: &Controller<P>, root: &Path) -> config::Session {
    config::Session {
        music_folder: fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf()),
        volume: controller.state().volume,
        shuffle: controller.state().shuffle,
    }
}
