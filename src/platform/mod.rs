//! Platform abstraction layer
//!
//! Handles the boundary between the terminal and the simulation:
//! - Input events (decoded key presses)
//! - Frame pacing for the fixed-tick loop

pub mod input;
pub mod time;

pub use input::{ChannelInput, InputEvent, InputSource, KeyAction, map_key};
pub use time::TickClock;
