use anyhow::Result;

use vitrine_ui::prelude::*;

use super::GAME_SELECT;

const BACKDROP: u32 = 0x23234a;

const SCALE_REST: f32 = 1.4;
const SCALE_HOVER: f32 = 1.55;
const SCALE_PRESSED: f32 = 1.2;

/// Title screen: full-window backdrop and a large "START GAME" button.
pub struct StartScene {
    background_image: Option<String>,
    fps: FpsCounter,
    listeners: ListenerSet,
    backdrop: Option<NodeId>,
    button: Option<Button>,
}

impl StartScene {
    /// `background_image` is drawn stretched over the window when set;
    /// otherwise the backdrop is a flat fill.
    pub fn new(background_image: Option<String>) -> Self {
        Self {
            background_image,
            fps: FpsCounter::new(),
            listeners: ListenerSet::new(),
            backdrop: None,
            button: None,
        }
    }

    fn layout(&self, ctx: &mut SceneCtx<'_>) {
        let vp = ctx.viewport;
        if let Some(backdrop) = self.backdrop {
            ctx.stage.set_size(backdrop, vp.size());
        }
        if let Some(button) = &self.button {
            let width = Button::SIZE.x * SCALE_REST;
            ctx.stage
                .set_position(button.node(), Vec2::new(vp.width / 2.0 - width / 2.0, vp.height * 0.65));
        }
    }
}

impl Scene for StartScene {
    fn init(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        let size = ctx.viewport.size();
        let backdrop = match &self.background_image {
            Some(source) => Node::image(source.clone(), size),
            None => Node::rect(size, Color::from_hex(BACKDROP)),
        };
        self.backdrop = Some(ctx.add(backdrop));

        let root = ctx.root;
        let button = Button::spawn(ctx, root, "START GAME");
        ctx.stage.set_scale(button.node(), SCALE_REST);
        self.button = Some(button);

        self.fps.attach(ctx);
        self.listeners.on(ctx, SignalKind::Resize);
        self.layout(ctx);
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
        self.backdrop = None;
        self.fps.detach();
        Ok(())
    }

    fn on_event(&mut self, listener: ListenerId, event: &Event, ctx: &mut SceneCtx<'_>) -> Result<()> {
        if let Event::Resize(_) = event {
            self.layout(ctx);
            return Ok(());
        }
        let Some(button) = self.button.as_mut() else { return Ok(()) };
        let node = button.node();
        let scale = match button.handle(ctx, listener, event) {
            Some(ButtonEvent::Over) => SCALE_HOVER,
            Some(ButtonEvent::Out) | Some(ButtonEvent::Up) => SCALE_REST,
            Some(ButtonEvent::Down) => SCALE_PRESSED,
            Some(ButtonEvent::Click) => {
                ctx.navigate(GAME_SELECT);
                return Ok(());
            }
            None => return Ok(()),
        };
        ctx.stage.set_scale(node, scale);
        Ok(())
    }
}
