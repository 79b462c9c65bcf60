//! Vitrine UI: named scenes with an explicit lifecycle on top of `vitrine-engine`.
//!
//! A [`SceneManager`] owns the stage, the event bus, timers, the content queue
//! and the audio sink, and keeps exactly one [`Scene`] active. Scenes build
//! nodes under their own root in `init`, react to deliveries, and undo
//! everything in `destroy`; the manager sweeps whatever they forget.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use vitrine_ui::prelude::*;
//!
//! struct Hello { fps: FpsCounter }
//!
//! impl Scene for Hello {
//!     fn init(&mut self, ctx: &mut SceneCtx<'_>) -> anyhow::Result<()> {
//!         ctx.add(Node::text("hello", TextStyle::new(24.0, Color::WHITE)).at(40.0, 40.0));
//!         self.fps.attach(ctx);
//!         Ok(())
//!     }
//!     fn update(&mut self, elapsed_ms: f32, ctx: &mut SceneCtx<'_>) -> anyhow::Result<()> {
//!         self.fps.update(ctx.stage, elapsed_ms);
//!         Ok(())
//!     }
//!     fn destroy(&mut self, ctx: &mut SceneCtx<'_>) -> anyhow::Result<()> {
//!         ctx.stage.destroy_children(ctx.root);
//!         self.fps.detach();
//!         Ok(())
//!     }
//! }
//!
//! Application::new()
//!     .scene("hello", Box::new(Hello { fps: FpsCounter::new() }))
//!     .run()?;
//! ```

pub mod app;
pub mod audio;
pub mod button;
pub mod content;
pub mod driver;
pub mod fps;
pub mod manager;
pub mod scene;

pub use app::Application;
pub use driver::FrameDriver;
pub use manager::{SceneError, SceneManager};
pub use scene::{ListenerSet, Scene, SceneCtx};

/// Everything a scene implementation needs.
pub mod prelude {
    pub use crate::app::Application;
    pub use crate::audio::{AudioSink, LogAudioSink, SoundCue, SoundId};
    pub use crate::button::{Button, ButtonEvent};
    pub use crate::content::{
        ContentError, ContentReply, ContentResult, ContentSource, ContentTicket, NoContent,
    };
    pub use crate::fps::FpsCounter;
    pub use crate::scene::{ListenerSet, Scene, SceneCtx};

    // Engine primitives scenes build with.
    pub use vitrine_engine::coords::{Rect, Vec2, Viewport};
    pub use vitrine_engine::draw::Border;
    pub use vitrine_engine::events::{Event, ListenerId, SignalKind};
    pub use vitrine_engine::paint::Color;
    pub use vitrine_engine::stage::{Node, NodeId, NodeKind, Stage, TextStyle};
    pub use vitrine_engine::timers::TimerId;
}
