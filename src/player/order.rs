//! Traversal order over the tracks of the active folder.
//!
//! The base list keeps catalog order; `order` is a permutation of indices
//! into it. With shuffle off the permutation is the identity.

use rand::Rng;
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::library::Track;

#[derive(Debug, Clone, Default)]
pub struct PlayOrder {
    tracks: Vec<Track>,
    order: Vec<usize>,
    shuffle: bool,
}

impl PlayOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the base list. The permutation goes back to catalog order;
    /// the shuffle flag is left as it was.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.order = (0..tracks.len()).collect();
        self.tracks = tracks;
    }

    /// Flip shuffle. Turning it on always draws a fresh permutation.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.toggle_shuffle_with(&mut thread_rng())
    }

    pub fn toggle_shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.shuffle = !self.shuffle;
        if self.shuffle {
            self.reshuffle_now_with(rng);
        } else {
            self.order = (0..self.tracks.len()).collect();
        }
        self.shuffle
    }

    /// Draw a new permutation without touching the flag.
    pub fn reshuffle_now(&mut self) {
        self.reshuffle_now_with(&mut thread_rng());
    }

    pub fn reshuffle_now_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order = (0..self.tracks.len()).collect();
        self.order.shuffle(rng);
    }

    /// Position of `track` in the current order, matched by path.
    pub fn index_of(&self, track: &Track) -> Option<usize> {
        self.order
            .iter()
            .position(|&i| self.tracks[i].same_file(track))
    }

    /// The following position, or `None` at the end. Never wraps.
    pub fn next(&self, position: usize) -> Option<usize> {
        let next = position.checked_add(1)?;
        (next < self.order.len()).then_some(next)
    }

    /// The preceding position, or `None` before the start. Never wraps.
    pub fn previous(&self, position: usize) -> Option<usize> {
        let prev = position.checked_sub(1)?;
        (prev < self.order.len()).then_some(prev)
    }

    pub fn get(&self, position: usize) -> Option<&Track> {
        self.order.get(position).map(|&i| &self.tracks[i])
    }

    /// Tracks in play order.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.order.iter().map(|&i| &self.tracks[i])
    }

    /// Tracks in catalog order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
