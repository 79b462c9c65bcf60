//! wgpu device and window surface.
//!
//! One [`Gpu`] per window: created once, kept configured across resizes,
//! and asked for a fresh encoder every frame.

mod gpu;
mod init;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
