use anyhow::Result;

use crate::draw::DrawList;

use super::{RenderCtx, RenderTarget};

/// Rasterizes a composed draw stream onto the frame target.
///
/// Called once per presented frame after the surface was cleared. The list
/// is mutable so implementations can use its cached paint order.
pub trait StageRenderer {
    fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        list: &mut DrawList,
    ) -> Result<()>;
}

/// Renderer that draws nothing; the surface shows only the clear color.
///
/// Logs the size of the draw stream at `trace` so composition can still be
/// inspected with `RUST_LOG=vitrine_engine=trace`.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl StageRenderer for NullRenderer {
    fn render(
        &mut self,
        _ctx: &RenderCtx<'_>,
        _target: &mut RenderTarget<'_>,
        list: &mut DrawList,
    ) -> Result<()> {
        log::trace!("render: {} draw items", list.len());
        Ok(())
    }
}
