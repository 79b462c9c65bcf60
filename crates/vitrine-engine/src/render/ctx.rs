use crate::coords::Viewport;
use crate::paint::Color;

/// GPU handles a [`StageRenderer`](super::StageRenderer) draws with.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Logical pixels; multiply by `scale_factor` for physical pixels.
    pub viewport: Viewport,
    pub scale_factor: f32,
}

/// The frame being recorded: its encoder and the surface texture view.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl RenderTarget<'_> {
    /// Records a pass that fills the whole target with `color`.
    pub fn clear(&mut self, color: Color) {
        let load = wgpu::LoadOp::Clear(wgpu::Color {
            r: f64::from(color.r),
            g: f64::from(color.g),
            b: f64::from(color.b),
            a: f64::from(color.a),
        });
        let attachment = wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: None,
            ops: wgpu::Operations { load, store: wgpu::StoreOp::Store },
            depth_slice: None,
        };
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("vitrine clear"),
            color_attachments: &[Some(attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}
