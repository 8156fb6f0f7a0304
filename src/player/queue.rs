use std::collections::VecDeque;

use crate::library::Track;

/// User-curated tracks that play before the play order. Consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    items: VecDeque<Track>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the back. Duplicates are allowed.
    pub fn add(&mut self, track: Track) {
        self.items.push_back(track);
    }

    pub fn pop_front(&mut self) -> Option<Track> {
        self.items.pop_front()
    }

    pub fn peek_front(&self) -> Option<&Track> {
        self.items.front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.items.iter()
    }
}
