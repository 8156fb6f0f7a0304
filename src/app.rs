//! Application module: the folder browser and the command surface.
//!
//! `App` holds what the user is looking at (folder listing, page, input
//! buffer); `Command` is what they typed.

mod command;
mod model;

pub use command::Command;
pub use model::*;
