//! The playback state machine.
//!
//! Every user command and every natural track completion goes through one
//! `Controller`, one call at a time. Output-port failures never escape: they
//! are logged, kept for the UI and skipped over.

use tracing::{debug, info, warn};

use crate::audio::OutputPort;
use crate::error::{PlayerError, Result};
use crate::library::Track;

use super::order::PlayOrder;
use super::queue::Queue;
use super::state::{PlaybackState, PlaybackStatus};

/// Where a track being started came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Origin {
    Order(usize),
    Queue,
}

pub struct Controller<P: OutputPort> {
    port: P,
    state: PlaybackState,
    order: PlayOrder,
    queue: Queue,
    volume_step: u8,
    failures: Vec<PlayerError>,
}

impl<P: OutputPort> Controller<P> {
    pub fn new(mut port: P, volume: u8, volume_step: u8) -> Self {
        let state = PlaybackState::new(volume);
        port.set_volume(state.volume);
        Self {
            port,
            state,
            order: PlayOrder::new(),
            queue: Queue::new(),
            volume_step,
            failures: Vec::new(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn order(&self) -> &PlayOrder {
        &self.order
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Playback errors since the last call, oldest first.
    pub fn take_failures(&mut self) -> Vec<PlayerError> {
        std::mem::take(&mut self.failures)
    }

    /// Adopt a new folder as the play order. Stops output and clears the
    /// current track; the queue and the shuffle flag survive.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) -> Result<()> {
        if tracks.is_empty() {
            return Err(PlayerError::InvalidInput("folder has no tracks".to_string()));
        }
        self.halt();
        self.order.set_tracks(tracks);
        if self.order.is_shuffled() {
            self.order.reshuffle_now();
        }
        self.state.cursor = None;
        Ok(())
    }

    /// Play `track` from the current play order.
    pub fn select_track(&mut self, track: &Track) -> Result<()> {
        let position = self
            .order
            .index_of(track)
            .ok_or_else(|| PlayerError::NotFound(track.path.clone()))?;

        if !self.start(track.clone(), Origin::Order(position)) {
            self.advance();
        }
        Ok(())
    }

    /// Resume when paused; start the next track when stopped.
    pub fn play(&mut self) {
        match self.state.status {
            PlaybackStatus::Paused if self.state.current.is_some() => {
                self.port.resume();
                self.state.status = PlaybackStatus::Playing;
            }
            PlaybackStatus::Stopped => self.advance(),
            _ => {}
        }
    }

    pub fn pause(&mut self) {
        if self.state.status == PlaybackStatus::Playing {
            self.port.pause();
            self.state.status = PlaybackStatus::Paused;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.status {
            PlaybackStatus::Playing => self.pause(),
            PlaybackStatus::Paused => self.play(),
            PlaybackStatus::Stopped => {}
        }
    }

    pub fn next(&mut self) {
        self.advance();
    }

    /// Step back in the play order. The queue keeps no history, so this
    /// always walks the play order from the cursor.
    pub fn previous(&mut self) {
        let Some(mut position) = self.state.cursor.and_then(|c| self.order.previous(c)) else {
            return;
        };

        loop {
            let Some(track) = self.order.get(position).cloned() else {
                self.halt();
                return;
            };
            if self.start(track, Origin::Order(position)) {
                return;
            }
            match self.order.previous(position) {
                Some(p) => position = p,
                None => {
                    self.halt();
                    return;
                }
            }
        }
    }

    /// Stop output and forget the current track. The cursor stays.
    pub fn stop(&mut self) {
        self.halt();
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.state.volume.saturating_add(self.volume_step));
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.state.volume.saturating_sub(self.volume_step));
    }

    pub fn set_volume(&mut self, level: u8) {
        self.state.volume = level.min(100);
        self.port.set_volume(self.state.volume);
    }

    /// Flip shuffle without interrupting the current track.
    pub fn toggle_shuffle(&mut self) -> bool {
        let anchor = self.cursor_track();
        let on = self.order.toggle_shuffle();
        self.state.shuffle = on;
        self.reanchor(anchor);
        info!(shuffle = on, "shuffle toggled");
        on
    }

    /// Draw a new order for upcoming tracks; playback continues.
    pub fn shuffle_now(&mut self) {
        let anchor = self.cursor_track();
        self.order.reshuffle_now();
        self.reanchor(anchor);
        info!("play order reshuffled");
    }

    pub fn enqueue(&mut self, track: Track) {
        debug!(path = %track.path.display(), "queued");
        self.queue.add(track);
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Natural-completion tick. Returns true when a finished track was
    /// handled like `next`.
    pub fn poll(&mut self) -> bool {
        if self.state.status == PlaybackStatus::Playing && self.port.is_finished() {
            debug!("track finished");
            self.advance();
            true
        } else {
            false
        }
    }

    /// The track `next` would try first.
    pub fn up_next(&self) -> Option<&Track> {
        self.queue
            .peek_front()
            .or_else(|| self.next_position().and_then(|p| self.order.get(p)))
    }

    /// Next-track resolution: queue first, then the play order. Failing
    /// tracks are skipped. Every failed attempt either consumes a queued
    /// track or moves the cursor forward, so the loop ends once both run out.
    fn advance(&mut self) {
        let mut skipped = 0usize;

        loop {
            let (track, origin) = if let Some(track) = self.queue.pop_front() {
                (track, Origin::Queue)
            } else {
                match self
                    .next_position()
                    .and_then(|p| self.order.get(p).cloned().map(|t| (t, p)))
                {
                    Some((track, p)) => (track, Origin::Order(p)),
                    None => {
                        if skipped > 0 {
                            warn!(skipped, "nothing playable left");
                        }
                        self.halt();
                        return;
                    }
                }
            };

            if self.start(track, origin) {
                return;
            }
            skipped += 1;
        }
    }

    /// Load and play one track. On failure the error is recorded and the
    /// controller is left stopped, with the cursor on the failed position.
    fn start(&mut self, track: Track, origin: Origin) -> bool {
        if let Origin::Order(position) = origin {
            self.state.cursor = Some(position);
        }

        match self.port.load(&track.path) {
            Ok(()) => {
                self.port.play();
                let from_queue = origin == Origin::Queue;
                info!(path = %track.path.display(), from_queue, "playing");
                self.state.current = Some(track);
                self.state.status = PlaybackStatus::Playing;
                true
            }
            Err(e) => {
                warn!(path = %track.path.display(), error = %e, "playback failed");
                self.failures.push(PlayerError::Playback {
                    path: track.path,
                    reason: e.to_string(),
                });
                self.state.current = None;
                self.state.status = PlaybackStatus::Stopped;
                false
            }
        }
    }

    fn next_position(&self) -> Option<usize> {
        match self.state.cursor {
            Some(c) => self.order.next(c),
            None if !self.order.is_empty() => Some(0),
            None => None,
        }
    }

    fn halt(&mut self) {
        self.port.stop();
        self.state.current = None;
        self.state.status = PlaybackStatus::Stopped;
    }

    fn cursor_track(&self) -> Option<Track> {
        self.state.cursor.and_then(|c| self.order.get(c)).cloned()
    }

    fn reanchor(&mut self, anchor: Option<Track>) {
        self.state.cursor = anchor.and_then(|t| self.order.index_of(&t));
    }
}
