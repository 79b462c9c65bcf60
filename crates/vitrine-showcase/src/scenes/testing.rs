//! Helpers for driving scenes through a real `SceneManager`.

use anyhow::Result;

use vitrine_engine::coords::{Vec2, Viewport};
use vitrine_engine::events::HostSignal;
use vitrine_engine::stage::{NodeId, NodeKind, Stage};
use vitrine_ui::audio::LogAudioSink;
use vitrine_ui::content::{ContentSource, NoContent};
use vitrine_ui::{FrameDriver, Scene, SceneCtx, SceneManager};

/// Target scene that does nothing; stands in for navigation destinations.
pub struct Blank;

impl Scene for Blank {
    fn init(&mut self, _ctx: &mut SceneCtx<'_>) -> Result<()> {
        Ok(())
    }
    fn update(&mut self, _elapsed_ms: f32, _ctx: &mut SceneCtx<'_>) -> Result<()> {
        Ok(())
    }
    fn destroy(&mut self, _ctx: &mut SceneCtx<'_>) -> Result<()> {
        Ok(())
    }
}

pub const VIEWPORT: Viewport = Viewport::new(1000.0, 800.0);

/// Manager with `scene` active under `name` and blank scenes under `others`.
pub fn run_with(
    name: &str,
    scene: Box<dyn Scene>,
    others: &[&str],
    source: Box<dyn ContentSource>,
    viewport: Viewport,
) -> SceneManager {
    let mut manager = SceneManager::new(source, Box::new(LogAudioSink::default()));
    manager.register(name, scene).unwrap();
    for other in others {
        manager.register(*other, Box::new(Blank)).unwrap();
    }
    manager.resize(viewport);
    manager.activate(name).unwrap();
    manager
}

pub fn run(name: &str, scene: Box<dyn Scene>, others: &[&str]) -> SceneManager {
    run_with(name, scene, others, Box::new(NoContent), VIEWPORT)
}

/// Every text node's content, depth first in paint order of insertion.
pub fn texts(stage: &Stage) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![stage.root()];
    while let Some(id) = stack.pop() {
        if let Some(NodeKind::Text { content, .. }) = stage.get(id).map(|n| &n.kind) {
            out.push(content.clone());
        }
        stack.extend(stage.children(id).iter().rev());
    }
    out
}

pub fn find_text(stage: &Stage, text: &str) -> Option<NodeId> {
    let mut stack = vec![stage.root()];
    while let Some(id) = stack.pop() {
        if matches!(stage.get(id).map(|n| &n.kind), Some(NodeKind::Text { content, .. }) if content == text) {
            return Some(id);
        }
        stack.extend(stage.children(id).iter().rev());
    }
    None
}

/// Stage-space center of a node's bounds.
pub fn center_of(stage: &Stage, id: NodeId) -> Vec2 {
    let b = stage.world_bounds(id).unwrap();
    Vec2::new(b.origin.x + b.size.x / 2.0, b.origin.y + b.size.y / 2.0)
}

/// Presses and releases at `at`, then applies any navigation.
pub fn tap(manager: &mut SceneManager, at: Vec2) {
    manager.dispatch(HostSignal::PointerDown(at));
    manager.dispatch(HostSignal::PointerUp(at));
    manager.apply_navigation();
}

/// Runs `frames` updates of `elapsed_ms` each, timers included.
pub fn frames(manager: &mut SceneManager, frames: usize, elapsed_ms: f32) {
    let mut driver = FrameDriver::new();
    for _ in 0..frames {
        driver.frame(manager, elapsed_ms, &[]);
    }
}
