//! Renderer-independent draw stream produced by composing the stage.

mod cmd;
mod list;

pub use cmd::{Border, CircleCmd, DrawCmd, ImageCmd, RectCmd, TextCmd};
pub use list::{DrawItem, DrawList, SortKey, ZIndex};
