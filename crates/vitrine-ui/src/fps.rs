use vitrine_engine::paint::Color;
use vitrine_engine::stage::{Node, NodeId, Stage, TextStyle};

use crate::scene::SceneCtx;

/// Frames-per-second readout in the top-left corner of a scene.
#[derive(Debug, Default)]
pub struct FpsCounter {
    node: Option<NodeId>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the readout on top of the scene's other content.
    pub fn attach(&mut self, ctx: &mut SceneCtx<'_>) {
        let node = ctx.add(Node::text("FPS: --", TextStyle::new(16.0, Color::WHITE)).at(20.0, 20.0).with_z(10_000));
        self.node = Some(node);
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn update(&mut self, stage: &mut Stage, elapsed_ms: f32) {
        let Some(node) = self.node else { return };
        if let Some(text) = label(elapsed_ms) {
            stage.set_text(node, text);
        }
    }

    /// Forgets the node; the scene's root teardown destroys it.
    pub fn detach(&mut self) {
        self.node = None;
    }
}

/// `round(1000 / elapsed)`, or `None` for a zero-length frame.
pub fn fps(elapsed_ms: f32) -> Option<u32> {
    (elapsed_ms > 0.0 && elapsed_ms.is_finite()).then(|| (1000.0 / elapsed_ms).round() as u32)
}

fn label(elapsed_ms: f32) -> Option<String> {
    fps(elapsed_ms).map(|n| format!("FPS: {n}"))
}

#[cfg(test)]
mod tests {
    use vitrine_engine::stage::NodeKind;

    use super::*;

    #[test]
    fn rounds_to_the_nearest_frame_rate() {
        assert_eq!(fps(16.0), Some(63));
        assert_eq!(fps(16.7), Some(60));
        assert_eq!(fps(33.3), Some(30));
        assert_eq!(fps(1000.0), Some(1));
    }

    #[test]
    fn zero_length_frames_have_no_rate() {
        assert_eq!(fps(0.0), None);
        assert_eq!(fps(-1.0), None);
    }

    #[test]
    fn update_rewrites_the_text() {
        let mut stage = Stage::new();
        let node = stage.insert(stage.root(), Node::text("FPS: --", TextStyle::new(16.0, Color::WHITE)));
        let mut counter = FpsCounter { node: Some(node) };

        counter.update(&mut stage, 20.0);
        let content = match &stage.get(node).unwrap().kind {
            NodeKind::Text { content, .. } => content.clone(),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(content, "FPS: 50");

        // A zero frame keeps the last reading.
        counter.update(&mut stage, 0.0);
        assert!(matches!(&stage.get(node).unwrap().kind, NodeKind::Text { content, .. } if content == "FPS: 50"));
    }
}
