use slotmap::SlotMap;

use crate::coords::{Vec2, Viewport};
use crate::epoch::Epoch;
use crate::stage::{NodeId, Stage};

use super::HostSignal;

slotmap::new_key_type! {
    /// Handle returned by [`EventBus::subscribe`] and [`EventBus::subscribe_node`].
    pub struct ListenerId;
}

/// What a listener wants to hear about.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SignalKind {
    Resize,
    PointerMove,
    PointerDown,
    /// Also delivered to pressed nodes when the release lands outside them.
    PointerUp,
    PointerOver,
    PointerOut,
    /// Press and release both landed on the node.
    Tap,
    Wheel,
}

/// An event delivered to a listener.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    Resize(Viewport),
    Wheel { position: Vec2, delta_y: f32 },
    Pointer {
        kind: SignalKind,
        /// The node the listener is attached to; `None` for surface listeners.
        node: Option<NodeId>,
        /// Topmost interactive node under the pointer, if any.
        target: Option<NodeId>,
        position: Vec2,
    },
}

impl Event {
    pub fn kind(&self) -> SignalKind {
        match self {
            Event::Resize(_) => SignalKind::Resize,
            Event::Wheel { .. } => SignalKind::Wheel,
            Event::Pointer { kind, .. } => *kind,
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            Event::Pointer { node, .. } => *node,
            _ => None,
        }
    }
}

/// One listener's share of a routed signal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Delivery {
    pub listener: ListenerId,
    pub event: Event,
}

#[derive(Debug, Clone)]
struct Listener {
    kind: SignalKind,
    node: Option<NodeId>,
    epoch: Epoch,
    seq: u64,
}

/// Subscription registry and pointer router.
///
/// Surface listeners (`node == None`) hear every signal of their kind. Node
/// listeners hear pointer signals whose hit path contains their node, target
/// first, then each ancestor. Only listeners stamped with the epoch passed
/// to [`EventBus::route`] receive anything.
#[derive(Debug, Default)]
pub struct EventBus {
    listeners: SlotMap<ListenerId, Listener>,
    next_seq: u64,

    routed_epoch: Epoch,
    hovered: Vec<NodeId>,
    pressed: Vec<NodeId>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listens for `kind` on the whole surface.
    pub fn subscribe(&mut self, kind: SignalKind, epoch: Epoch) -> ListenerId {
        self.add(Listener { kind, node: None, epoch, seq: 0 })
    }

    /// Listens for `kind` on `node` and its descendants.
    pub fn subscribe_node(&mut self, node: NodeId, kind: SignalKind, epoch: Epoch) -> ListenerId {
        self.add(Listener { kind, node: Some(node), epoch, seq: 0 })
    }

    fn add(&mut self, mut listener: Listener) -> ListenerId {
        listener.seq = self.next_seq;
        self.next_seq += 1;
        self.listeners.insert(listener)
    }

    /// Returns `false` if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of listeners stamped with `epoch`.
    pub fn count_for(&self, epoch: Epoch) -> usize {
        self.listeners.values().filter(|l| l.epoch == epoch).count()
    }

    /// Drops every listener not stamped with `keep`. Returns how many were dropped.
    pub fn sweep(&mut self, keep: Epoch) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|_, l| l.epoch == keep);
        before - self.listeners.len()
    }

    /// Resolves `signal` against `stage` and returns deliveries in dispatch order.
    pub fn route(&mut self, signal: HostSignal, stage: &Stage, epoch: Epoch) -> Vec<Delivery> {
        if epoch != self.routed_epoch {
            // Paths recorded under another scene point at nodes it owned.
            self.hovered.clear();
            self.pressed.clear();
            self.routed_epoch = epoch;
        }

        let mut out = Vec::new();
        match signal {
            HostSignal::Resized(viewport) => {
                for id in self.surface_listeners(SignalKind::Resize, epoch) {
                    out.push(Delivery { listener: id, event: Event::Resize(viewport) });
                }
            }

            HostSignal::Wheel { position, delta_y } => {
                for id in self.surface_listeners(SignalKind::Wheel, epoch) {
                    out.push(Delivery { listener: id, event: Event::Wheel { position, delta_y } });
                }
            }

            HostSignal::PointerMoved(position) => {
                let path = hit_path(stage, position);
                let target = path.first().copied();
                self.update_hover(path.clone(), target, position, epoch, &mut out);
                self.pointer(SignalKind::PointerMove, &path, target, position, epoch, &mut out);
            }

            HostSignal::PointerDown(position) => {
                let path = hit_path(stage, position);
                let target = path.first().copied();
                self.update_hover(path.clone(), target, position, epoch, &mut out);
                self.pointer(SignalKind::PointerDown, &path, target, position, epoch, &mut out);
                self.pressed = path;
            }

            HostSignal::PointerUp(position) => {
                let path = hit_path(stage, position);
                let target = path.first().copied();
                let pressed = std::mem::take(&mut self.pressed);

                self.pointer(SignalKind::PointerUp, &path, target, position, epoch, &mut out);

                let outside: Vec<NodeId> =
                    pressed.iter().copied().filter(|n| !path.contains(n)).collect();
                self.node_listeners(SignalKind::PointerUp, &outside, target, position, epoch, &mut out);

                let tapped: Vec<NodeId> =
                    path.iter().copied().filter(|n| pressed.contains(n)).collect();
                self.pointer(SignalKind::Tap, &tapped, target, position, epoch, &mut out);
            }

            HostSignal::PointerLeft => {
                let left = std::mem::take(&mut self.hovered);
                let position = Vec2::new(-1.0, -1.0);
                self.node_listeners(SignalKind::PointerOut, &left, None, position, epoch, &mut out);
            }
        }
        out
    }

    fn update_hover(
        &mut self,
        path: Vec<NodeId>,
        target: Option<NodeId>,
        position: Vec2,
        epoch: Epoch,
        out: &mut Vec<Delivery>,
    ) {
        let left: Vec<NodeId> =
            self.hovered.iter().copied().filter(|n| !path.contains(n)).collect();
        let entered: Vec<NodeId> =
            path.iter().copied().filter(|n| !self.hovered.contains(n)).collect();

        self.node_listeners(SignalKind::PointerOut, &left, target, position, epoch, out);
        self.node_listeners(SignalKind::PointerOver, &entered, target, position, epoch, out);
        self.hovered = path;
    }

    /// Node listeners along `path`, then surface listeners.
    fn pointer(
        &self,
        kind: SignalKind,
        path: &[NodeId],
        target: Option<NodeId>,
        position: Vec2,
        epoch: Epoch,
        out: &mut Vec<Delivery>,
    ) {
        self.node_listeners(kind, path, target, position, epoch, out);
        for id in self.surface_listeners(kind, epoch) {
            out.push(Delivery {
                listener: id,
                event: Event::Pointer { kind, node: None, target, position },
            });
        }
    }

    fn node_listeners(
        &self,
        kind: SignalKind,
        nodes: &[NodeId],
        target: Option<NodeId>,
        position: Vec2,
        epoch: Epoch,
        out: &mut Vec<Delivery>,
    ) {
        for node in nodes {
            let mut matching: Vec<(u64, ListenerId)> = self
                .listeners
                .iter()
                .filter(|(_, l)| l.kind == kind && l.epoch == epoch && l.node == Some(*node))
                .map(|(id, l)| (l.seq, id))
                .collect();
            matching.sort_unstable_by_key(|(seq, _)| *seq);

            for (_, id) in matching {
                out.push(Delivery {
                    listener: id,
                    event: Event::Pointer { kind, node: Some(*node), target, position },
                });
            }
        }
    }

    fn surface_listeners(&self, kind: SignalKind, epoch: Epoch) -> Vec<ListenerId> {
        let mut matching: Vec<(u64, ListenerId)> = self
            .listeners
            .iter()
            .filter(|(_, l)| l.kind == kind && l.epoch == epoch && l.node.is_none())
            .map(|(id, l)| (l.seq, id))
            .collect();
        matching.sort_unstable_by_key(|(seq, _)| *seq);
        matching.into_iter().map(|(_, id)| id).collect()
    }
}

fn hit_path(stage: &Stage, position: Vec2) -> Vec<NodeId> {
    stage.hit_test(position).map(|hit| stage.path_to_root(hit)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::stage::Node;

    const E: Epoch = Epoch::new(1);

    fn button(stage: &mut Stage, x: f32) -> NodeId {
        let root = stage.root();
        stage.insert(root, Node::rect(Vec2::splat(50.0), Color::WHITE).at(x, 0.0).interactive())
    }

    fn kinds(out: &[Delivery]) -> Vec<SignalKind> {
        out.iter().map(|d| d.event.kind()).collect()
    }

    // ── subscriptions ─────────────────────────────────────────────────────

    #[test]
    fn sweep_drops_other_epochs() {
        let mut bus = EventBus::new();
        bus.subscribe(SignalKind::Resize, Epoch::new(1));
        bus.subscribe(SignalKind::Resize, Epoch::new(2));
        let keep = bus.subscribe(SignalKind::Wheel, Epoch::new(2));

        assert_eq!(bus.count_for(Epoch::new(1)), 1);
        assert_eq!(bus.sweep(Epoch::new(2)), 1);
        assert_eq!(bus.len(), 2);
        assert!(bus.contains(keep));
    }

    #[test]
    fn unsubscribe_twice_reports_false() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(SignalKind::Resize, E);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());
    }

    // ── surface signals ───────────────────────────────────────────────────

    #[test]
    fn resize_reaches_current_epoch_only_in_subscription_order() {
        let stage = Stage::new();
        let mut bus = EventBus::new();
        let a = bus.subscribe(SignalKind::Resize, E);
        bus.subscribe(SignalKind::Resize, Epoch::new(9));
        let b = bus.subscribe(SignalKind::Resize, E);

        let vp = Viewport::new(800.0, 600.0);
        let out = bus.route(HostSignal::Resized(vp), &stage, E);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Delivery { listener: a, event: Event::Resize(vp) });
        assert_eq!(out[1].listener, b);
    }

    #[test]
    fn wheel_reaches_surface_listeners() {
        let stage = Stage::new();
        let mut bus = EventBus::new();
        let id = bus.subscribe(SignalKind::Wheel, E);
        let out = bus.route(
            HostSignal::Wheel { position: Vec2::zero(), delta_y: 40.0 },
            &stage,
            E,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].listener, id);
        assert!(matches!(out[0].event, Event::Wheel { delta_y, .. } if delta_y == 40.0));
    }

    // ── pointer routing ───────────────────────────────────────────────────

    #[test]
    fn over_and_out_follow_the_pointer() {
        let mut stage = Stage::new();
        let a = button(&mut stage, 0.0);
        let b = button(&mut stage, 100.0);
        let mut bus = EventBus::new();
        let over_a = bus.subscribe_node(a, SignalKind::PointerOver, E);
        let out_a = bus.subscribe_node(a, SignalKind::PointerOut, E);
        let over_b = bus.subscribe_node(b, SignalKind::PointerOver, E);

        let out = bus.route(HostSignal::PointerMoved(Vec2::new(10.0, 10.0)), &stage, E);
        assert_eq!(out.iter().map(|d| d.listener).collect::<Vec<_>>(), vec![over_a]);

        // Moving within the same node is not a new "over".
        let out = bus.route(HostSignal::PointerMoved(Vec2::new(20.0, 10.0)), &stage, E);
        assert!(out.is_empty());

        let out = bus.route(HostSignal::PointerMoved(Vec2::new(110.0, 10.0)), &stage, E);
        assert_eq!(out.iter().map(|d| d.listener).collect::<Vec<_>>(), vec![out_a, over_b]);
    }

    #[test]
    fn pointer_left_sends_out() {
        let mut stage = Stage::new();
        let a = button(&mut stage, 0.0);
        let mut bus = EventBus::new();
        bus.subscribe_node(a, SignalKind::PointerOut, E);

        bus.route(HostSignal::PointerMoved(Vec2::new(10.0, 10.0)), &stage, E);
        let out = bus.route(HostSignal::PointerLeft, &stage, E);
        assert_eq!(kinds(&out), vec![SignalKind::PointerOut]);
    }

    #[test]
    fn tap_requires_press_and_release_on_node() {
        let mut stage = Stage::new();
        let a = button(&mut stage, 0.0);
        let mut bus = EventBus::new();
        let tap = bus.subscribe_node(a, SignalKind::Tap, E);

        bus.route(HostSignal::PointerDown(Vec2::new(10.0, 10.0)), &stage, E);
        let out = bus.route(HostSignal::PointerUp(Vec2::new(12.0, 10.0)), &stage, E);
        assert_eq!(out.iter().map(|d| d.listener).collect::<Vec<_>>(), vec![tap]);
        assert_eq!(out[0].event.node(), Some(a));

        bus.route(HostSignal::PointerDown(Vec2::new(10.0, 10.0)), &stage, E);
        let out = bus.route(HostSignal::PointerUp(Vec2::new(300.0, 10.0)), &stage, E);
        assert!(out.is_empty());

        bus.route(HostSignal::PointerDown(Vec2::new(300.0, 10.0)), &stage, E);
        let out = bus.route(HostSignal::PointerUp(Vec2::new(10.0, 10.0)), &stage, E);
        assert!(out.is_empty());
    }

    #[test]
    fn release_outside_still_reaches_pressed_node() {
        let mut stage = Stage::new();
        let a = button(&mut stage, 0.0);
        let mut bus = EventBus::new();
        bus.subscribe_node(a, SignalKind::PointerUp, E);

        bus.route(HostSignal::PointerDown(Vec2::new(10.0, 10.0)), &stage, E);
        let out = bus.route(HostSignal::PointerUp(Vec2::new(300.0, 10.0)), &stage, E);
        assert_eq!(kinds(&out), vec![SignalKind::PointerUp]);
        assert!(matches!(out[0].event, Event::Pointer { target: None, .. }));
    }

    #[test]
    fn node_events_bubble_to_ancestors() {
        let mut stage = Stage::new();
        let root = stage.root();
        let card = stage.insert(root, Node::container().at(0.0, 0.0));
        let face = stage.insert(card, Node::rect(Vec2::splat(50.0), Color::WHITE).interactive());

        let mut bus = EventBus::new();
        let on_face = bus.subscribe_node(face, SignalKind::PointerDown, E);
        let on_card = bus.subscribe_node(card, SignalKind::PointerDown, E);
        let on_surface = bus.subscribe(SignalKind::PointerDown, E);

        let out = bus.route(HostSignal::PointerDown(Vec2::new(5.0, 5.0)), &stage, E);
        assert_eq!(
            out.iter().map(|d| d.listener).collect::<Vec<_>>(),
            vec![on_face, on_card, on_surface]
        );
        assert_eq!(out[1].event.node(), Some(card));
        assert!(matches!(out[1].event, Event::Pointer { target: Some(t), .. } if t == face));
    }

    #[test]
    fn epoch_change_forgets_hover_and_press() {
        let mut stage = Stage::new();
        let a = button(&mut stage, 0.0);
        let mut bus = EventBus::new();
        bus.route(HostSignal::PointerDown(Vec2::new(10.0, 10.0)), &stage, E);

        let next = E.next();
        bus.subscribe_node(a, SignalKind::Tap, next);
        bus.subscribe_node(a, SignalKind::PointerOut, next);
        let out = bus.route(HostSignal::PointerUp(Vec2::new(10.0, 10.0)), &stage, next);
        assert!(out.is_empty());
    }

    #[test]
    fn stale_listeners_are_not_delivered() {
        let mut stage = Stage::new();
        let a = button(&mut stage, 0.0);
        let mut bus = EventBus::new();
        bus.subscribe_node(a, SignalKind::PointerDown, E);
        let out = bus.route(HostSignal::PointerDown(Vec2::new(10.0, 10.0)), &stage, E.next());
        assert!(out.is_empty());
    }
}
