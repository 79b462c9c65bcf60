use vitrine_engine::coords::{Rect, Vec2};
use vitrine_engine::draw::Border;
use vitrine_engine::events::{Event, EventBus, ListenerId, SignalKind};
use vitrine_engine::paint::Color;
use vitrine_engine::stage::{Node, NodeId, Stage, TextStyle};

use crate::scene::{ListenerSet, SceneCtx};

const FILL: u32 = 0x4a4a4a;
const TINT_HOVER: u32 = 0x666666;
const TINT_PRESSED: u32 = 0x333333;

/// What happened to a [`Button`], as reported by [`Button::handle`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonEvent {
    Over,
    Out,
    Down,
    /// Released, on or off the button.
    Up,
    /// Pressed and released on the button.
    Click,
}

/// Rounded label button shared by the scenes.
///
/// The button owns a small subtree (container, background, label) and the
/// listeners on it. Scenes forward their deliveries to [`Button::handle`] and
/// call [`Button::destroy`] on teardown.
#[derive(Debug)]
pub struct Button {
    root: NodeId,
    background: NodeId,
    label: NodeId,
    listeners: ListenerSet,
}

impl Button {
    pub const SIZE: Vec2 = Vec2::new(150.0, 40.0);

    /// Builds the button under `parent` with its origin at the top-left corner.
    pub fn spawn(ctx: &mut SceneCtx<'_>, parent: NodeId, text: &str) -> Self {
        let size = Self::SIZE;
        let root = ctx.add_to(
            parent,
            Node::container().interactive().with_hit_area(Rect::from_origin_size(Vec2::zero(), size)),
        );
        let background = ctx.add_to(
            root,
            Node::rounded_rect(size, 10.0, Color::from_hex(FILL)).with_border(Border::new(2.0, Color::WHITE)),
        );
        let label = ctx.add_to(
            root,
            Node::text(text, TextStyle::new(16.0, Color::WHITE))
                .with_anchor(0.5, 0.5)
                .at(size.x / 2.0, size.y / 2.0),
        );

        let mut listeners = ListenerSet::new();
        for kind in [
            SignalKind::PointerOver,
            SignalKind::PointerOut,
            SignalKind::PointerDown,
            SignalKind::PointerUp,
            SignalKind::Tap,
        ] {
            listeners.on_node(ctx, root, kind);
        }

        Self { root, background, label, listeners }
    }

    pub fn node(&self) -> NodeId {
        self.root
    }

    pub fn label(&self) -> NodeId {
        self.label
    }

    pub fn owns(&self, listener: ListenerId) -> bool {
        self.listeners.contains(listener)
    }

    /// Scales the pointer hit box around the button, e.g. for touch screens.
    pub fn set_hit_area(&self, ctx: &mut SceneCtx<'_>, rect: Rect) {
        if let Some(node) = ctx.stage.get_mut(self.root) {
            node.hit_area = Some(rect);
        }
    }

    /// Reacts to a delivery. Returns `None` when the listener isn't ours.
    ///
    /// Tints the background the same way for every scene; anything beyond
    /// that (scaling, navigation) is up to the caller.
    pub fn handle(&mut self, ctx: &mut SceneCtx<'_>, listener: ListenerId, event: &Event) -> Option<ButtonEvent> {
        if !self.owns(listener) {
            return None;
        }
        let (outcome, tint) = match event.kind() {
            SignalKind::PointerOver => (ButtonEvent::Over, Some(TINT_HOVER)),
            SignalKind::PointerOut => (ButtonEvent::Out, Some(0xffffff)),
            SignalKind::PointerDown => (ButtonEvent::Down, Some(TINT_PRESSED)),
            SignalKind::PointerUp => (ButtonEvent::Up, Some(TINT_HOVER)),
            SignalKind::Tap => (ButtonEvent::Click, None),
            _ => return None,
        };
        if let Some(tint) = tint {
            ctx.stage.set_tint(self.background, Color::from_hex(tint));
        }
        Some(outcome)
    }

    /// Releases listeners and nodes. Safe to call more than once.
    pub fn destroy(&mut self, stage: &mut Stage, events: &mut EventBus) {
        self.listeners.release(events);
        stage.destroy(self.root);
    }
}
