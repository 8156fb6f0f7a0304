use std::path::PathBuf;

use crate::audio::OutputPort;
use crate::mpris::MprisHandle;
use crate::player::{Controller, PlaybackStatus};

/// What MPRIS was last told, so unchanged state is not republished.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MprisSnapshot {
    path: Option<PathBuf>,
    status: PlaybackStatus,
}

impl MprisSnapshot {
    fn of<P: OutputPort>(controller: &Controller<P>) -> Self {
        let state = controller.state();
        Self {
            path: state.current.as_ref().map(|t| t.path.clone()),
            status: state.status,
        }
    }
}

pub fn update_mpris<P: OutputPort>(
    mpris: &MprisHandle,
    controller: &Controller<P>,
    last: &mut MprisSnapshot,
) {
    let now = MprisSnapshot::of(controller);
    if now == *last {
        return;
    }
    mpris.set_track_metadata(controller.state().current.as_ref());
    mpris.set_playback(now.status);
    *last = now;
}
