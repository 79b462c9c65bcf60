//! Vitrine engine crate.
//!
//! Platform runtime (window, render surface, input, frame clock) plus the
//! retained stage, event routing and timers that scenes are built on.

pub mod coords;
pub mod core;
pub mod device;
pub mod draw;
pub mod epoch;
pub mod events;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod stage;
pub mod time;
pub mod timers;
pub mod window;
