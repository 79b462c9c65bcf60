//! Where a composed stage meets the GPU.
//!
//! The runtime clears the surface every frame. Rasterizing the
//! [`DrawList`](crate::draw::DrawList) is left to a [`StageRenderer`] the
//! application plugs in.

mod ctx;
mod stage_renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use stage_renderer::{NullRenderer, StageRenderer};
