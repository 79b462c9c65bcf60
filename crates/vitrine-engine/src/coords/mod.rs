//! Geometry in logical pixels: origin at the top-left, +x right, +y down.
//!
//! The stage, pointer routing and every scene layout share these types.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
