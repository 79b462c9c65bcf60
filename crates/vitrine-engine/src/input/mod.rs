//! Window input, reduced to pointer, wheel and focus events.
//!
//! Nothing here exposes winit types; `platform::winit` does the translation
//! for the runtime.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, MouseButton, MouseButtonState, MouseWheelDelta};
