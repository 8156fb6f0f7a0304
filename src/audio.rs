//! Audio output: the `OutputPort` capability and its `rodio` backend.
//!
//! The controller drives a port synchronously; decoding and mixing happen on
//! rodio's own thread behind the `Sink`.

mod player;
mod port;
mod sink;

pub use player::RodioOutput;
pub use port::OutputPort;
