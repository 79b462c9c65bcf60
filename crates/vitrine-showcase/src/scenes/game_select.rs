use anyhow::Result;

use vitrine_ui::prelude::*;

use super::{ACE_OF_SHADOWS, MAGIC_WORDS, PHOENIX_FLAME};

struct Game {
    title: &'static str,
    emoji: &'static str,
    color: u32,
    scene: &'static str,
}

const GAMES: [Game; 3] = [
    Game { title: "🪄 Magic Words", emoji: "🪄", color: 0x4e54c8, scene: MAGIC_WORDS },
    Game { title: "🔥 Phoenix Flame", emoji: "🔥", color: 0xff9000, scene: PHOENIX_FLAME },
    Game { title: "🂡 Ace of Shadows", emoji: "🂡", color: 0x3b3b5c, scene: ACE_OF_SHADOWS },
];

const CARD_ALPHA: f32 = 0.92;
const HOVER_SCALE: f32 = 1.06;
/// Alpha change per frame while fading.
const FADE_STEP: f32 = 0.08;

/// Card geometry for a viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
struct CardLayout {
    width: f32,
    height: f32,
    gap: f32,
    start_x: f32,
    y: f32,
}

impl CardLayout {
    fn new(vp: Viewport, count: usize) -> Self {
        let width = (vp.width * 0.28).min(260.0);
        let height = (vp.height * 0.32).min(260.0);
        let gap = (vp.width * 0.04).min(40.0);
        let n = count as f32;
        let total = width * n + gap * (n - 1.0).max(0.0);
        Self {
            width,
            height,
            gap,
            start_x: vp.width / 2.0 - total / 2.0,
            y: vp.height / 2.0 - height / 2.0,
        }
    }

    fn origin(&self, index: usize) -> Vec2 {
        Vec2::new(self.start_x + index as f32 * (self.width + self.gap), self.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Fade {
    In,
    Shown,
    Out { target: &'static str, t: f32 },
    Done,
}

struct Card {
    node: NodeId,
    background: NodeId,
}

/// Three game cards; picking one fades the screen out and opens that game.
pub struct GameSelectScene {
    fps: FpsCounter,
    listeners: ListenerSet,
    card_listeners: ListenerSet,
    content: Option<NodeId>,
    cards: Vec<Card>,
    fade: Fade,
    alpha: f32,
}

impl GameSelectScene {
    pub fn new() -> Self {
        Self {
            fps: FpsCounter::new(),
            listeners: ListenerSet::new(),
            card_listeners: ListenerSet::new(),
            content: None,
            cards: Vec::new(),
            fade: Fade::In,
            alpha: 0.0,
        }
    }

    /// Rebuilds every card against the current viewport.
    fn build_cards(&mut self, ctx: &mut SceneCtx<'_>) {
        let Some(content) = self.content else { return };
        self.card_listeners.release(ctx.events);
        ctx.stage.destroy_children(content);
        self.cards.clear();

        let layout = CardLayout::new(ctx.viewport, GAMES.len());
        let (w, h) = (layout.width, layout.height);

        for (i, game) in GAMES.iter().enumerate() {
            let origin = layout.origin(i);
            let node = ctx.add_to(
                content,
                Node::container()
                    .at(origin.x, origin.y)
                    .interactive()
                    .with_hit_area(Rect::new(0.0, 0.0, w, h)),
            );
            let background = ctx.add_to(
                node,
                Node::rounded_rect(Vec2::new(w, h), 32.0, Color::from_hex(game.color)).with_alpha(CARD_ALPHA),
            );
            ctx.add_to(
                node,
                Node::text(game.emoji, TextStyle::new((h * 0.32).floor(), Color::WHITE))
                    .with_anchor(0.5, 0.5)
                    .at(w / 2.0, h * 0.36),
            );
            ctx.add_to(
                node,
                Node::text(game.title, TextStyle::new((h * 0.16).floor(), Color::WHITE).bold().wrap(w * 0.9))
                    .with_anchor(0.5, 0.5)
                    .at(w / 2.0, h * 0.78),
            );

            for kind in [SignalKind::PointerOver, SignalKind::PointerOut, SignalKind::Tap] {
                self.card_listeners.on_node(ctx, node, kind);
            }
            self.cards.push(Card { node, background });
        }
    }

    fn set_hover(&self, ctx: &mut SceneCtx<'_>, index: usize, hovered: bool) {
        let card = &self.cards[index];
        ctx.stage.set_alpha(card.background, if hovered { 1.0 } else { CARD_ALPHA });
        ctx.stage.set_scale(card.node, if hovered { HOVER_SCALE } else { 1.0 });
    }
}

impl Default for GameSelectScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for GameSelectScene {
    fn init(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.fade = Fade::In;
        self.alpha = 0.0;
        self.content = Some(ctx.add(Node::container().with_alpha(0.0)));
        self.build_cards(ctx);
        self.fps.attach(ctx);
        self.listeners.on(ctx, SignalKind::Resize);
        Ok(())
    }

    fn update(&mut self, elapsed_ms: f32, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.fps.update(ctx.stage, elapsed_ms);

        match self.fade {
            Fade::In => {
                self.alpha = (self.alpha + FADE_STEP).min(1.0);
                if self.alpha >= 1.0 {
                    self.fade = Fade::Shown;
                }
            }
            Fade::Out { target, t } => {
                let t = t - FADE_STEP;
                self.alpha = t.max(0.0);
                self.fade = if t > 0.0 {
                    Fade::Out { target, t }
                } else {
                    ctx.navigate(target);
                    Fade::Done
                };
            }
            Fade::Shown | Fade::Done => return Ok(()),
        }
        if let Some(content) = self.content {
            ctx.stage.set_alpha(content, self.alpha);
        }
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.listeners.release(ctx.events);
        self.card_listeners.release(ctx.events);
        ctx.stage.destroy_children(ctx.root);
        self.cards.clear();
        self.content = None;
        self.fps.detach();
        Ok(())
    }

    fn on_event(&mut self, _listener: ListenerId, event: &Event, ctx: &mut SceneCtx<'_>) -> Result<()> {
        if let Event::Resize(_) = event {
            self.build_cards(ctx);
            return Ok(());
        }
        let Some(index) = event.node().and_then(|n| self.cards.iter().position(|c| c.node == n)) else {
            return Ok(());
        };
        match event.kind() {
            SignalKind::PointerOver => self.set_hover(ctx, index, true),
            SignalKind::PointerOut => self.set_hover(ctx, index, false),
            SignalKind::Tap if !matches!(self.fade, Fade::Out { .. } | Fade::Done) => {
                log::debug!("gameselect: picked {}", GAMES[index].scene);
                self.fade = Fade::Out { target: GAMES[index].scene, t: self.alpha };
            }
            _ => {}
        }
        Ok(())
    }
}
