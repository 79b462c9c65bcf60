//! Dialogue scene: speech bubbles revealed one at a time, with avatars,
//! inline emoji and a scrollable, clipped window.

mod dialogue;

use anyhow::Result;

use vitrine_ui::prelude::*;

use self::dialogue::{Dialogue, Line, Part, Side};
use super::GAME_SELECT;
use crate::tween::Tween;

/// Top of the clipped dialogue window.
const WINDOW_TOP: f32 = 100.0;
const WINDOW_BOTTOM_GAP: f32 = 120.0;
const ROW_GAP: f32 = 40.0;
const SCROLL_STEP: f32 = 120.0;
const REVEAL_MS: f32 = 500.0;

const EMOJI_SIZE: f32 = 24.0;
const AVATAR_SIZE: f32 = 36.0;
const PART_GAP: f32 = 6.0;
const BUBBLE_PADDING: f32 = 10.0;

const BUBBLE_FILL: u32 = 0x23234a;
const NAME_COLOR: u32 = 0xffff88;
const ERROR_COLOR: u32 = 0xff4444;

const ARROW_IMAGE: &str = "assets/arrow-down.png";
const ARROW_SIZE: f32 = 40.0;

/// Scroll offset bounds for the dialogue column.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Scroll {
    y: f32,
    min: f32,
    max: f32,
}

impl Scroll {
    fn new() -> Self {
        Self { y: 0.0, min: 0.0, max: 0.0 }
    }

    /// Recomputes the lower bound for `content_bottom` inside a window of
    /// `visible` height and clamps the offset into it.
    fn fit(&mut self, visible: f32, content_bottom: f32) {
        self.max = 0.0;
        self.min = (visible - content_bottom - 100.0).min(0.0);
        self.y = self.y.clamp(self.min, self.max);
    }

    fn by(&mut self, delta: f32) {
        self.y = (self.y + delta).clamp(self.min, self.max);
    }
}

/// A bubble still fading in. The next line waits for it.
struct Reveal {
    bubble: NodeId,
    fade: Tween<f32>,
    height: f32,
}

pub struct MagicWordsScene {
    location: String,
    fps: FpsCounter,
    listeners: ListenerSet,
    back: Option<Button>,
    window: Option<NodeId>,
    column: Option<NodeId>,
    arrow: Option<NodeId>,
    ticket: Option<ContentTicket>,
    dialogue: Option<Dialogue>,
    rows: Vec<NodeId>,
    next_line: usize,
    next_y: f32,
    reveal: Option<Reveal>,
    scroll: Scroll,
}

impl MagicWordsScene {
    /// `location` is handed to the content source when the scene starts.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            fps: FpsCounter::new(),
            listeners: ListenerSet::new(),
            back: None,
            window: None,
            column: None,
            arrow: None,
            ticket: None,
            dialogue: None,
            rows: Vec::new(),
            next_line: 0,
            next_y: WINDOW_TOP,
            reveal: None,
            scroll: Scroll::new(),
        }
    }

    fn window_mask(vp: Viewport) -> Rect {
        Rect::new(0.0, WINDOW_TOP, vp.width, (vp.height - WINDOW_BOTTOM_GAP).max(0.0))
    }

    fn show_error(&mut self, ctx: &mut SceneCtx<'_>) {
        let Some(column) = self.column else { return };
        ctx.stage.destroy_children(column);
        self.rows.clear();
        ctx.add_to(
            column,
            Node::text("Failed to load dialogue", TextStyle::new(32.0, Color::from_hex(ERROR_COLOR))).at(50.0, 120.0),
        );
    }

    fn show_next_line(&mut self, ctx: &mut SceneCtx<'_>) {
        let (Some(dialogue), Some(column)) = (self.dialogue.as_ref(), self.column) else { return };
        let Some(line) = dialogue.lines.get(self.next_line) else { return };

        let (row, bubble, height) = build_row(ctx, column, dialogue, line, self.next_y);
        self.rows.push(row);
        self.next_line += 1;
        self.reveal = Some(Reveal { bubble, fade: Tween::new(0.0, 1.0, REVEAL_MS), height });
    }

    fn refit_scroll(&mut self, ctx: &mut SceneCtx<'_>) {
        let bottom = self
            .rows
            .iter()
            .filter_map(|row| {
                let y = ctx.stage.get(*row)?.position.y;
                Some(y + ctx.stage.local_bounds(*row)?.size.y)
            })
            .fold(0.0f32, f32::max);
        self.scroll.fit(ctx.viewport.height, bottom);
        self.apply_scroll(ctx);
    }

    fn apply_scroll(&self, ctx: &mut SceneCtx<'_>) {
        if let Some(column) = self.column {
            ctx.stage.set_position(column, Vec2::new(0.0, self.scroll.y));
        }
    }

    fn layout(&mut self, ctx: &mut SceneCtx<'_>) {
        let vp = ctx.viewport;
        if let Some(window) = self.window.and_then(|w| ctx.stage.get_mut(w)) {
            window.mask = Some(Self::window_mask(vp));
        }
        if let Some(arrow) = self.arrow {
            ctx.stage.set_position(arrow, Vec2::new(vp.width / 2.0, vp.height - ARROW_SIZE));
        }
        if let Some(back) = &self.back {
            super::place_back_button(ctx, back);
        }
        self.refit_scroll(ctx);
    }
}

/// Builds one dialogue row at `y` in `column`.
///
/// Returns the row, its bubble (transparent until revealed) and the bubble
/// height.
fn build_row(
    ctx: &mut SceneCtx<'_>,
    column: NodeId,
    dialogue: &Dialogue,
    line: &Line,
    y: f32,
) -> (NodeId, NodeId, f32) {
    let vp = ctx.viewport;
    let row = ctx.add_to(column, Node::container());
    let bubble = ctx.add_to(row, Node::rounded_rect(Vec2::zero(), 12.0, Color::from_hex(BUBBLE_FILL)).with_alpha(0.0));

    let content = ctx.add_to(row, Node::container());
    let mut x = BUBBLE_PADDING;
    for part in dialogue.tokenize(&line.message) {
        let node = match part {
            Part::Text(text) => {
                Node::text(text, TextStyle::new(18.0, Color::WHITE).wrap(vp.width - 140.0)).at(x, 0.0)
            }
            Part::Emoji { url, .. } => {
                Node::image(url, Vec2::splat(EMOJI_SIZE)).with_anchor(0.0, 0.15).at(x, 0.0)
            }
        };
        let id = ctx.add_to(content, node);
        x += ctx.stage.size(id).x + PART_GAP;
    }

    let measured = ctx.stage.local_bounds(content).map(|b| b.size).unwrap_or_default();
    let bubble_size = measured + Vec2::splat(BUBBLE_PADDING * 2.0);
    ctx.stage.set_size(bubble, bubble_size);

    let name = ctx.add_to(
        row,
        Node::text(line.speaker.as_str(), TextStyle::new(14.0, Color::from_hex(NAME_COLOR))).at(0.0, -20.0),
    );

    let side = dialogue.side(&line.speaker);
    let row_x = match dialogue.avatar(&line.speaker) {
        Some(avatar) => {
            let avatar_node = ctx.add_to(row, Node::image(avatar.url.as_str(), Vec2::splat(AVATAR_SIZE)));
            match side {
                Side::Left => {
                    let offset = AVATAR_SIZE + BUBBLE_PADDING;
                    ctx.stage.set_position(bubble, Vec2::new(offset, 0.0));
                    ctx.stage.set_position(content, Vec2::new(offset + BUBBLE_PADDING, BUBBLE_PADDING));
                    ctx.stage.set_position(name, Vec2::new(offset, -20.0));
                    50.0
                }
                Side::Right => {
                    ctx.stage.set_position(avatar_node, Vec2::new(bubble_size.x + BUBBLE_PADDING, 0.0));
                    ctx.stage.set_position(content, Vec2::new(BUBBLE_PADDING, BUBBLE_PADDING));
                    vp.width - bubble_size.x - 100.0
                }
            }
        }
        None => {
            ctx.stage.set_position(content, Vec2::new(BUBBLE_PADDING, BUBBLE_PADDING));
            match side {
                Side::Left => 50.0,
                Side::Right => vp.width - bubble_size.x - 50.0,
            }
        }
    };
    ctx.stage.set_position(row, Vec2::new(row_x, y));

    (row, bubble, bubble_size.y)
}

impl Scene for MagicWordsScene {
    fn init(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.rows.clear();
        self.dialogue = None;
        self.reveal = None;
        self.next_line = 0;
        self.next_y = WINDOW_TOP;
        self.scroll = Scroll::new();

        let window = ctx.add(Node::container().with_mask(Self::window_mask(ctx.viewport)));
        self.window = Some(window);
        self.column = Some(ctx.add_to(window, Node::container()));

        let root = ctx.root;
        self.back = Some(Button::spawn(ctx, root, "Back to Menu"));

        let arrow = ctx.add(
            Node::image(ARROW_IMAGE, Vec2::splat(ARROW_SIZE))
                .with_anchor(0.5, 0.5)
                .with_z(9999)
                .interactive(),
        );
        self.arrow = Some(arrow);
        self.listeners.on_node(ctx, arrow, SignalKind::PointerDown);

        self.fps.attach(ctx);
        self.listeners.on(ctx, SignalKind::Wheel);
        self.listeners.on(ctx, SignalKind::Resize);
        self.layout(ctx);

        self.ticket = Some(ctx.request_content(&self.location));
        Ok(())
    }

    fn update(&mut self, elapsed_ms: f32, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.fps.update(ctx.stage, elapsed_ms);

        let Some(reveal) = self.reveal.as_mut() else { return Ok(()) };
        let alpha = reveal.fade.advance(elapsed_ms);
        ctx.stage.set_alpha(reveal.bubble, alpha);
        if reveal.fade.is_finished() {
            self.next_y += reveal.height + ROW_GAP;
            self.reveal = None;
            self.refit_scroll(ctx);
            self.show_next_line(ctx);
        }
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.listeners.release(ctx.events);
        if let Some(mut back) = self.back.take() {
            back.destroy(ctx.stage, ctx.events);
        }
        ctx.stage.destroy_children(ctx.root);
        self.window = None;
        self.column = None;
        self.arrow = None;
        self.ticket = None;
        self.dialogue = None;
        self.rows.clear();
        self.reveal = None;
        self.fps.detach();
        Ok(())
    }

    fn on_event(&mut self, listener: ListenerId, event: &Event, ctx: &mut SceneCtx<'_>) -> Result<()> {
        match event {
            Event::Resize(_) => {
                self.layout(ctx);
                return Ok(());
            }
            Event::Wheel { delta_y, .. } => {
                self.scroll.by(-delta_y);
                self.apply_scroll(ctx);
                return Ok(());
            }
            _ if event.kind() == SignalKind::PointerDown && event.node() == self.arrow => {
                self.scroll.by(-SCROLL_STEP);
                self.apply_scroll(ctx);
                return Ok(());
            }
            _ => {}
        }

        let Some(back) = self.back.as_mut() else { return Ok(()) };
        if back.handle(ctx, listener, event) == Some(ButtonEvent::Click) {
            ctx.navigate(GAME_SELECT);
        }
        Ok(())
    }

    fn on_content(&mut self, ticket: ContentTicket, result: ContentResult, ctx: &mut SceneCtx<'_>) -> Result<()> {
        if self.ticket != Some(ticket) {
            return Ok(());
        }
        self.ticket = None;

        match result.and_then(|body| Dialogue::parse(&body)) {
            Ok(dialogue) => {
                log::info!("magicwords: {} lines from {:?}", dialogue.lines.len(), self.location);
                self.dialogue = Some(dialogue);
                self.show_next_line(ctx);
            }
            Err(err) => {
                log::error!("magicwords: could not load {:?}: {err}", self.location);
                self.show_error(ctx);
            }
        }
        Ok(())
    }
}
