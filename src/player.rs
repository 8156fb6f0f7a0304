//! Playback core: play order, the user queue and the controller state machine.
//!
//! `Controller` owns all mutable playback state. Everything else (the UI,
//! MPRIS) reads snapshots through it and sends commands back in.

mod controller;
mod order;
mod queue;
mod state;

pub use controller::Controller;
pub use order::PlayOrder;
pub use queue::Queue;
pub use state::{PlaybackState, PlaybackStatus};

#[cfg(test)]
mod tests;
