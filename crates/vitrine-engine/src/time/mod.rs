//! Frame timing. The runtime ticks one [`FrameClock`] per presented frame;
//! tests tick it with explicit instants.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
