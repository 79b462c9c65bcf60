//! Retained scene-graph for scene content.
//!
//! Scenes build trees of [`Node`]s (containers, rects, circles, text, image
//! sprites) under their own root. Each frame the stage is flattened into a
//! [`DrawList`](crate::draw::DrawList) and pointer positions are resolved
//! against it for event routing.

mod compose;
mod node;
mod text;
mod tree;

pub use node::{Node, NodeId, NodeKind, TextStyle};
pub use text::measure_text;
pub use tree::{Stage, Transform};

