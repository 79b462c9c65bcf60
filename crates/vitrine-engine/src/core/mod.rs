//! The contract between the platform loop and whatever runs inside it.

mod app;
mod ctx;

pub(crate) use ctx::logical_viewport;
pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
