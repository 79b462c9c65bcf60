use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vitrine_ui::prelude::*;

use super::GAME_SELECT;
use crate::tween::{Pulse, Tween};

const STACKS: usize = 4;
const CARDS_PER_STACK: usize = 36;
const CARD_IMAGE: &str = "assets/card-back.png";
const CARD_SIZE: Vec2 = Vec2::new(80.0, 120.0);

const MOVE_EVERY_MS: f32 = 1000.0;
const MOVE_MS: f32 = 2000.0;
const PULSE_LEG_MS: f32 = 300.0;
const PULSE_PEAK: f32 = 1.05;
const MOVING_Z: i32 = 1000;

/// Where the stacks sit for a given window size.
#[derive(Debug, Copy, Clone, PartialEq)]
struct StackLayout {
    mobile: bool,
    bases: [Vec2; STACKS],
    /// Vertical step between consecutive cards of a stack.
    step: f32,
    card_scale: f32,
}

impl StackLayout {
    fn new(vp: Viewport) -> Self {
        let mobile = vp.width < 600.0;
        let (card_w, card_h, spacing) = if mobile {
            ((vp.width * 0.18).floor(), (vp.height * 0.18).floor(), (vp.width * 0.08).floor())
        } else {
            (CARD_SIZE.x, CARD_SIZE.y, 120.0)
        };
        let n = STACKS as f32;
        let total = n * card_w + (n - 1.0) * spacing;
        let start_x = (vp.width - total) / 2.0 + card_w / 2.0;
        let y = vp.height / 2.0 - if mobile { card_h * 1.2 } else { 200.0 };

        let mut bases = [Vec2::zero(); STACKS];
        for (i, base) in bases.iter_mut().enumerate() {
            *base = Vec2::new(start_x + i as f32 * (card_w + spacing), y);
        }

        let card_scale = if mobile {
            (vp.width / 600.0).min(vp.height / 700.0)
        } else {
            (vp.width / 1000.0).min(vp.height / 800.0)
        };

        Self { mobile, bases, step: if mobile { 2.0 } else { 4.0 }, card_scale }
    }

    /// Position of the card `depth` cards from the bottom of `stack`.
    fn slot(&self, stack: usize, depth: usize) -> Vec2 {
        self.bases[stack] + Vec2::new(0.0, depth as f32 * self.step)
    }

    fn back_button_scale(&self) -> f32 {
        if self.mobile { 1.5 } else { 1.0 }
    }

    fn back_button_margin(&self) -> f32 {
        if self.mobile { 24.0 } else { 20.0 }
    }
}

/// Picks a non-empty source stack and a different destination.
///
/// Needs at least two non-empty stacks, so cards never all pile up on one.
fn pick_move(heights: &[usize], rng: &mut impl Rng) -> Option<(usize, usize)> {
    let sources: Vec<usize> = (0..heights.len()).filter(|i| heights[*i] > 0).collect();
    if sources.len() < 2 {
        return None;
    }
    let from = sources[rng.gen_range(0..sources.len())];
    let mut to = rng.gen_range(0..heights.len() - 1);
    if to >= from {
        to += 1;
    }
    Some((from, to))
}

/// A card travelling between stacks.
struct Flight {
    card: NodeId,
    to: usize,
    path: Tween<Vec2>,
    pulse: Pulse,
}

/// Four stacks of numbered cards; every second the top card of one stack
/// glides onto another.
pub struct AceOfShadowsScene {
    rng: StdRng,
    fps: FpsCounter,
    listeners: ListenerSet,
    back: Option<Button>,
    stacks: Vec<Vec<NodeId>>,
    flight: Option<Flight>,
    mover: Option<TimerId>,
    layout: StackLayout,
}

impl AceOfShadowsScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic move order.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            fps: FpsCounter::new(),
            listeners: ListenerSet::new(),
            back: None,
            stacks: Vec::new(),
            flight: None,
            mover: None,
            layout: StackLayout::new(Viewport::new(1000.0, 800.0)),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    fn spawn_card(ctx: &mut SceneCtx<'_>, number: usize) -> NodeId {
        let card = ctx.add(Node::container());
        ctx.add_to(card, Node::image(CARD_IMAGE, CARD_SIZE).with_anchor(0.5, 0.5));
        ctx.add_to(
            card,
            Node::text(
                number.to_string(),
                TextStyle::new(24.0, Color::WHITE).stroke(Border::new(4.0, Color::BLACK)),
            )
            .with_anchor(0.5, 0.5),
        );
        card
    }

    fn layout(&mut self, ctx: &mut SceneCtx<'_>) {
        self.layout = StackLayout::new(ctx.viewport);
        let layout = self.layout;

        for (i, stack) in self.stacks.iter().enumerate() {
            for (depth, card) in stack.iter().enumerate() {
                ctx.stage.set_position(*card, layout.slot(i, depth));
                ctx.stage.set_scale(*card, layout.card_scale);
                ctx.stage.set_z(*card, depth as i32);
            }
        }

        if let Some(back) = &self.back {
            let scale = layout.back_button_scale();
            ctx.stage.set_scale(back.node(), scale);
            ctx.stage
                .set_position(back.node(), super::back_button_origin(ctx.viewport, scale, layout.back_button_margin()));
            let hit = if layout.mobile {
                Rect::new(-20.0, -20.0, Button::SIZE.x + 40.0, Button::SIZE.y + 40.0)
            } else {
                Rect::from_origin_size(Vec2::zero(), Button::SIZE)
            };
            back.set_hit_area(ctx, hit);
        }
    }

    fn launch(&mut self, ctx: &mut SceneCtx<'_>) {
        if self.flight.is_some() {
            return;
        }
        let heights: Vec<usize> = self.stacks.iter().map(Vec::len).collect();
        let Some((from, to)) = pick_move(&heights, &mut self.rng) else { return };
        let Some(card) = self.stacks[from].pop() else { return };

        let start = ctx.stage.get(card).map(|n| n.position).unwrap_or_default();
        let target = self.layout.slot(to, self.stacks[to].len());
        ctx.stage.set_z(card, MOVING_Z);
        log::debug!("aceofshadows: card moves {from} -> {to}");

        self.flight = Some(Flight {
            card,
            to,
            path: Tween::new(start, target, MOVE_MS),
            pulse: Pulse::new(self.layout.card_scale, PULSE_PEAK, PULSE_LEG_MS),
        });
    }

    fn fly(&mut self, elapsed_ms: f32, ctx: &mut SceneCtx<'_>) {
        let Some(flight) = self.flight.as_mut() else { return };
        let at = flight.path.advance(elapsed_ms);
        ctx.stage.set_position(flight.card, at);
        if !flight.pulse.is_finished() {
            let scale = flight.pulse.advance(elapsed_ms);
            ctx.stage.set_scale(flight.card, scale);
        }
        if !flight.path.is_finished() {
            return;
        }

        let Flight { card, to, .. } = *flight;
        self.flight = None;
        let depth = self.stacks[to].len();
        self.stacks[to].push(card);
        ctx.stage.set_position(card, self.layout.slot(to, depth));
        ctx.stage.set_scale(card, self.layout.card_scale);
        ctx.stage.set_z(card, depth as i32);
    }
}

impl Default for AceOfShadowsScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for AceOfShadowsScene {
    fn init(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.stacks = vec![Vec::with_capacity(CARDS_PER_STACK); STACKS];
        self.flight = None;

        let mut number = 1;
        for stack in &mut self.stacks {
            for _ in 0..CARDS_PER_STACK {
                stack.push(Self::spawn_card(ctx, number));
                number += 1;
            }
        }

        let root = ctx.root;
        self.back = Some(Button::spawn(ctx, root, "Back to Menu"));
        self.fps.attach(ctx);
        self.listeners.on(ctx, SignalKind::Resize);
        self.mover = Some(ctx.set_interval(MOVE_EVERY_MS));
        self.layout(ctx);
        Ok(())
    }

    fn update(&mut self, elapsed_ms: f32, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.fps.update(ctx.stage, elapsed_ms);
        self.fly(elapsed_ms, ctx);
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        if let Some(timer) = self.mover.take() {
            ctx.timers.cancel(timer);
        }
        self.listeners.release(ctx.events);
        if let Some(mut back) = self.back.take() {
            back.destroy(ctx.stage, ctx.events);
        }
        ctx.stage.destroy_children(ctx.root);
        self.stacks.clear();
        self.flight = None;
        self.fps.detach();
        Ok(())
    }

    fn on_event(&mut self, listener: ListenerId, event: &Event, ctx: &mut SceneCtx<'_>) -> Result<()> {
        if let Event::Resize(_) = event {
            self.layout(ctx);
            return Ok(());
        }
        let animating = self.is_animating();
        let Some(back) = self.back.as_mut() else { return Ok(()) };
        if back.handle(ctx, listener, event) == Some(ButtonEvent::Click) {
            if animating {
                log::debug!("aceofshadows: back ignored while a card is moving");
            } else {
                ctx.navigate(GAME_SELECT);
            }
        }
        Ok(())
    }

    fn on_timer(&mut self, timer: TimerId, ctx: &mut SceneCtx<'_>) -> Result<()> {
        if Some(timer) == self.mover {
            self.launch(ctx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing;

    fn ace() -> vitrine_ui::SceneManager {
        testing::run("aceofshadows", Box::new(AceOfShadowsScene::with_seed(7)), &[GAME_SELECT])
    }

    /// Card count per stack, read back from card positions.
    fn heights(m: &vitrine_ui::SceneManager) -> Vec<usize> {
        let bases = StackLayout::new(testing::VIEWPORT).bases;
        let mut heights = vec![0; STACKS];
        for text in testing::texts(m.stage()).iter().filter(|t| t.parse::<usize>().is_ok()) {
            let label = testing::find_text(m.stage(), text).unwrap();
            let card = m.stage().get(label).unwrap().parent().unwrap();
            let x = m.stage().get(card).unwrap().position.x;
            if let Some(i) = bases.iter().position(|b| b.x == x) {
                heights[i] += 1;
            }
        }
        heights
    }

    fn moving(m: &vitrine_ui::SceneManager) -> usize {
        let mut count = 0;
        let mut stack = vec![m.stage().root()];
        while let Some(id) = stack.pop() {
            if m.stage().get(id).unwrap().z_index == MOVING_Z {
                count += 1;
            }
            stack.extend(m.stage().children(id));
        }
        count
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn desktop_layout_centers_four_stacks() {
        let l = StackLayout::new(Viewport::new(1000.0, 800.0));
        assert!(!l.mobile);
        // 4*80 + 3*120 = 680 wide, centered.
        assert_eq!(l.bases[0], Vec2::new(200.0, 200.0));
        assert_eq!(l.bases[3], Vec2::new(800.0, 200.0));
        assert_eq!(l.slot(1, 2), Vec2::new(400.0, 208.0));
        assert_eq!(l.card_scale, 1.0);
    }

    #[test]
    fn narrow_windows_use_the_mobile_layout() {
        let l = StackLayout::new(Viewport::new(500.0, 700.0));
        assert!(l.mobile);
        assert_eq!(l.step, 2.0);
        assert_eq!(l.back_button_scale(), 1.5);
        assert_eq!(l.card_scale, (500.0f32 / 600.0).min(1.0));
        // card 90x126, spacing 40
        assert_eq!(l.bases[0].y, 350.0 - 126.0 * 1.2);
    }

    // ── moves ─────────────────────────────────────────────────────────────

    #[test]
    fn moves_go_between_distinct_stacks() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let (from, to) = pick_move(&[3, 0, 1, 5], &mut rng).unwrap();
            assert_ne!(from, to);
            assert_ne!(from, 1);
            assert!(to < 4);
        }
    }

    #[test]
    fn no_move_with_a_single_non_empty_stack() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_move(&[0, 144, 0, 0], &mut rng), None);
        assert_eq!(pick_move(&[0, 0, 0, 0], &mut rng), None);
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn builds_one_hundred_forty_four_numbered_cards() {
        let m = ace();
        let numbers: Vec<usize> =
            testing::texts(m.stage()).iter().filter_map(|t| t.parse().ok()).collect();
        assert_eq!(numbers.len(), STACKS * CARDS_PER_STACK);
        assert_eq!(numbers.first(), Some(&1));
        assert_eq!(numbers.iter().max(), Some(&144));
        assert_eq!(m.timers().len(), 1);
    }

    #[test]
    fn a_card_lands_on_another_stack_after_the_flight() {
        let mut m = ace();
        let nodes = m.stage().len();

        assert_eq!(heights(&m), vec![36; STACKS]);

        // The interval fires first, then the flight is halfway.
        testing::frames(&mut m, 1, 1000.0);
        assert_eq!(moving(&m), 1);
        assert_eq!(heights(&m).iter().sum::<usize>(), STACKS * CARDS_PER_STACK - 1);

        testing::frames(&mut m, 1, 1000.0);
        assert_eq!(moving(&m), 0);
        let mut h = heights(&m);
        h.sort();
        assert_eq!(h, vec![35, 36, 36, 37]);
        assert_eq!(m.stage().len(), nodes);
    }

    #[test]
    fn back_is_ignored_while_a_card_moves() {
        let mut m = ace();
        testing::frames(&mut m, 1, 1000.0);
        let label = testing::find_text(m.stage(), "Back to Menu").unwrap();
        let back = m.stage().get(label).unwrap().parent().unwrap();
        let at = testing::center_of(m.stage(), back);

        testing::tap(&mut m, at);
        assert_eq!(m.current(), Some("aceofshadows"));

        testing::frames(&mut m, 1, 2000.0);
        testing::tap(&mut m, at);
        assert_eq!(m.current(), Some(GAME_SELECT));
    }

    #[test]
    fn leaving_cancels_the_mover() {
        let mut m = ace();
        m.activate(GAME_SELECT).unwrap();
        assert_eq!(m.timers().len(), 0);
        assert_eq!(m.events().len(), 0);
    }
}
