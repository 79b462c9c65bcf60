use anyhow::Result;

use vitrine_engine::coords::Viewport;
use vitrine_engine::epoch::Epoch;
use vitrine_engine::events::{Event, EventBus, ListenerId, SignalKind};
use vitrine_engine::stage::{Node, NodeId, Stage};
use vitrine_engine::timers::{TimerId, Timers};

use crate::audio::AudioSink;
use crate::content::{ContentQueue, ContentResult, ContentTicket};

/// A unit of on-screen content with an explicit lifecycle.
///
/// Scenes are constructed once, registered under a name, and then
/// initialized and destroyed every time they are activated and left.
/// `destroy` must undo everything `init` set up (listeners, timers, nodes,
/// sounds) and must cope with a partial or failed `init`.
pub trait Scene {
    fn init(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()>;

    /// Called once per frame while active. `elapsed_ms` varies frame to frame.
    fn update(&mut self, elapsed_ms: f32, ctx: &mut SceneCtx<'_>) -> Result<()>;

    fn destroy(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()>;

    /// A signal this scene subscribed to was delivered.
    fn on_event(&mut self, listener: ListenerId, event: &Event, ctx: &mut SceneCtx<'_>) -> Result<()> {
        let _ = (listener, event, ctx);
        Ok(())
    }

    /// A timer this scene armed came due.
    fn on_timer(&mut self, timer: TimerId, ctx: &mut SceneCtx<'_>) -> Result<()> {
        let _ = (timer, ctx);
        Ok(())
    }

    /// A content request this scene issued completed during its activation.
    fn on_content(
        &mut self,
        ticket: ContentTicket,
        result: ContentResult,
        ctx: &mut SceneCtx<'_>,
    ) -> Result<()> {
        let _ = (ticket, result, ctx);
        Ok(())
    }
}

/// Everything a scene may touch during a callback.
///
/// Subscriptions, timers and content requests made through the helper
/// methods are stamped with the current [`Epoch`].
pub struct SceneCtx<'a> {
    pub stage: &'a mut Stage,
    /// The scene's own root container. Owned by the manager; never destroy it.
    pub root: NodeId,
    pub events: &'a mut EventBus,
    pub timers: &'a mut Timers,
    pub content: &'a mut ContentQueue,
    pub audio: &'a mut dyn AudioSink,
    pub viewport: Viewport,
    pub epoch: Epoch,
    pub(crate) navigation: &'a mut Vec<String>,
}

impl<'a> SceneCtx<'a> {
    /// Requests a transition to the scene registered as `name`.
    ///
    /// Applied after the current callback returns, so the caller keeps running
    /// with a consistent state.
    pub fn navigate(&mut self, name: impl Into<String>) {
        self.navigation.push(name.into());
    }

    /// Appends `node` under the scene root.
    pub fn add(&mut self, node: Node) -> NodeId {
        self.stage.insert(self.root, node)
    }

    pub fn add_to(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.stage.insert(parent, node)
    }

    pub fn subscribe(&mut self, kind: SignalKind) -> ListenerId {
        self.events.subscribe(kind, self.epoch)
    }

    pub fn subscribe_node(&mut self, node: NodeId, kind: SignalKind) -> ListenerId {
        self.events.subscribe_node(node, kind, self.epoch)
    }

    pub fn set_interval(&mut self, period_ms: f32) -> TimerId {
        self.timers.set_interval(period_ms, self.epoch)
    }

    pub fn set_timeout(&mut self, delay_ms: f32) -> TimerId {
        self.timers.set_timeout(delay_ms, self.epoch)
    }

    pub fn request_content(&mut self, location: &str) -> ContentTicket {
        self.content.request(location, self.epoch)
    }
}

/// Listener handles a scene registered, released together in `destroy`.
#[derive(Debug, Default)]
pub struct ListenerSet {
    ids: Vec<ListenerId>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, ctx: &mut SceneCtx<'_>, kind: SignalKind) -> ListenerId {
        let id = ctx.subscribe(kind);
        self.ids.push(id);
        id
    }

    pub fn on_node(&mut self, ctx: &mut SceneCtx<'_>, node: NodeId, kind: SignalKind) -> ListenerId {
        let id = ctx.subscribe_node(node, kind);
        self.ids.push(id);
        id
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unsubscribes everything. Returns how many were still registered.
    pub fn release(&mut self, events: &mut EventBus) -> usize {
        self.ids.drain(..).filter(|id| events.unsubscribe(*id)).count()
    }
}
