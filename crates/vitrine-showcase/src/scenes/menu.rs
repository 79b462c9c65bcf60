use anyhow::Result;

use vitrine_ui::prelude::*;

use super::{ACE_OF_SHADOWS, MAGIC_WORDS, PHOENIX_FLAME};

const OPTIONS: [(&str, &str); 3] = [
    ("Ace of Shadows", ACE_OF_SHADOWS),
    ("Magic Words", MAGIC_WORDS),
    ("Phoenix Flame", PHOENIX_FLAME),
];

const OPTION_SPACING: f32 = 260.0;
const OPTION_Y: f32 = 200.0;
const OPTION_BOX: Rect = Rect { origin: Vec2::new(-120.0, -40.0), size: Vec2::new(240.0, 80.0) };

/// Centered "Start Game" button; pressing it reveals the three game options.
pub struct MenuScene {
    fps: FpsCounter,
    listeners: ListenerSet,
    layer: Option<NodeId>,
    options: Option<NodeId>,
    option_nodes: Vec<(NodeId, &'static str)>,
    button: Option<Button>,
}

impl MenuScene {
    pub fn new() -> Self {
        Self {
            fps: FpsCounter::new(),
            listeners: ListenerSet::new(),
            layer: None,
            options: None,
            option_nodes: Vec::new(),
            button: None,
        }
    }

    fn reveal_options(&self, ctx: &mut SceneCtx<'_>) {
        if let Some(options) = self.options {
            ctx.stage.set_visible(options, true);
        }
    }
}

impl Default for MenuScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for MenuScene {
    fn init(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        let center = ctx.viewport.center();
        let layer = ctx.add(Node::container().at(center.x, center.y));
        self.layer = Some(layer);

        let button = Button::spawn(ctx, layer, "Start Game");
        ctx.stage.set_position(button.node(), Vec2::new(-Button::SIZE.x / 2.0, -Button::SIZE.y / 2.0));
        self.button = Some(button);

        let options = ctx.add_to(layer, Node::container().hidden());
        self.options = Some(options);
        for (i, (label, scene)) in OPTIONS.iter().enumerate() {
            let option = ctx.add_to(
                options,
                Node::container()
                    .at((i as f32 - 1.0) * OPTION_SPACING, OPTION_Y)
                    .interactive()
                    .with_hit_area(OPTION_BOX),
            );
            ctx.add_to(
                option,
                Node::rounded_rect(OPTION_BOX.size, 18.0, Color::from_hex(0x23234a))
                    .at(OPTION_BOX.origin.x, OPTION_BOX.origin.y)
                    .with_alpha(0.85),
            );
            ctx.add_to(
                option,
                Node::text(*label, TextStyle::new(32.0, Color::WHITE).bold()).with_anchor(0.5, 0.5),
            );
            self.listeners.on_node(ctx, option, SignalKind::PointerDown);
            self.option_nodes.push((option, scene));
        }

        self.fps.attach(ctx);
        self.listeners.on(ctx, SignalKind::Resize);
        Ok(())
    }

    fn update(&mut self, elapsed_ms: f32, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.fps.update(ctx.stage, elapsed_ms);
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.listeners.release(ctx.events);
        if let Some(mut button) = self.button.take() {
            button.destroy(ctx.stage, ctx.events);
        }
        ctx.stage.destroy_children(ctx.root);
        self.layer = None;
        self.options = None;
        self.option_nodes.clear();
        self.fps.detach();
        Ok(())
    }

    fn on_event(&mut self, listener: ListenerId, event: &Event, ctx: &mut SceneCtx<'_>) -> Result<()> {
        match event {
            Event::Resize(vp) => {
                if let Some(layer) = self.layer {
                    ctx.stage.set_position(layer, vp.center());
                }
                return Ok(());
            }
            _ if event.kind() == SignalKind::PointerDown => {
                let target = event.node().and_then(|n| self.option_nodes.iter().find(|(o, _)| *o == n));
                if let Some((_, scene)) = target {
                    ctx.navigate(*scene);
                    return Ok(());
                }
            }
            _ => {}
        }

        let Some(button) = self.button.as_mut() else { return Ok(()) };
        match button.handle(ctx, listener, event) {
            Some(ButtonEvent::Down) => self.reveal_options(ctx),
            Some(ButtonEvent::Click) => ctx.navigate(ACE_OF_SHADOWS),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vitrine_engine::events::HostSignal;

    use super::*;
    use crate::scenes::testing;

    fn menu() -> vitrine_ui::SceneManager {
        testing::run("menu", Box::new(MenuScene::new()), &[ACE_OF_SHADOWS, MAGIC_WORDS, PHOENIX_FLAME])
    }

    fn options_visible(m: &vitrine_ui::SceneManager) -> bool {
        let label = testing::find_text(m.stage(), "Magic Words").unwrap();
        let option = m.stage().get(label).unwrap().parent().unwrap();
        let options = m.stage().get(option).unwrap().parent().unwrap();
        m.stage().get(options).unwrap().visible
    }

    #[test]
    fn button_is_centered() {
        let m = menu();
        let label = testing::find_text(m.stage(), "Start Game").unwrap();
        let button = m.stage().get(label).unwrap().parent().unwrap();
        assert_eq!(testing::center_of(m.stage(), button), Vec2::new(500.0, 400.0));
    }

    #[test]
    fn options_start_hidden_and_appear_on_press() {
        let mut m = menu();
        assert!(!options_visible(&m));
        m.dispatch(HostSignal::PointerDown(Vec2::new(500.0, 400.0)));
        assert!(options_visible(&m));
    }

    #[test]
    fn pressing_an_option_opens_its_scene() {
        let mut m = menu();
        m.dispatch(HostSignal::PointerDown(Vec2::new(500.0, 400.0)));
        m.dispatch(HostSignal::PointerUp(Vec2::new(10.0, 10.0)));
        m.apply_navigation();
        assert_eq!(m.current(), Some("menu"));

        // Phoenix Flame sits one spacing right of center.
        m.dispatch(HostSignal::PointerDown(Vec2::new(760.0, 600.0)));
        m.apply_navigation();
        assert_eq!(m.current(), Some(PHOENIX_FLAME));
    }

    #[test]
    fn click_on_start_opens_ace_of_shadows() {
        let mut m = menu();
        testing::tap(&mut m, Vec2::new(500.0, 400.0));
        assert_eq!(m.current(), Some(ACE_OF_SHADOWS));
    }

    #[test]
    fn resize_recenters() {
        let mut m = menu();
        m.resize(Viewport::new(600.0, 400.0));
        let label = testing::find_text(m.stage(), "Start Game").unwrap();
        let button = m.stage().get(label).unwrap().parent().unwrap();
        assert_eq!(testing::center_of(m.stage(), button), Vec2::new(300.0, 200.0));
    }
}
