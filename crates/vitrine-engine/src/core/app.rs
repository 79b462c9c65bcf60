use crate::coords::Viewport;

use super::ctx::FrameCtx;

/// Whether the runtime keeps going after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// What the runtime drives: one resize hook and one frame hook.
pub trait App {
    /// The window now measures `viewport` logical pixels and the surface has
    /// been reconfigured. Minimized (0x0) sizes are not reported.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
