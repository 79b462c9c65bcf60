use anyhow::Result;
use thiserror::Error;

use vitrine_engine::coords::Viewport;
use vitrine_engine::draw::DrawList;
use vitrine_engine::epoch::Epoch;
use vitrine_engine::events::{EventBus, HostSignal};
use vitrine_engine::stage::{Node, NodeId, Stage};
use vitrine_engine::timers::Timers;

use crate::audio::AudioSink;
use crate::content::{ContentQueue, ContentSource};
use crate::scene::{Scene, SceneCtx};

/// Upper bound on transitions applied in one `apply_navigation` call.
///
/// A scene that navigates from its own `init` could otherwise bounce forever.
const MAX_HOPS: usize = 8;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene {0:?} is already registered")]
    AlreadyRegistered(String),
    #[error("scene {0:?} not found")]
    NotFound(String),
    #[error("scene {name:?} failed to initialize: {reason}")]
    InitFailed { name: String, reason: String },
}

struct Registered {
    name: String,
    root: NodeId,
    scene: Box<dyn Scene>,
}

/// Registry of named scenes with exactly one (or no) active scene.
///
/// The manager owns everything scenes share: the stage, the event bus, the
/// timer queue, the content queue and the audio sink. Scenes only see them
/// through a [`SceneCtx`] during their callbacks.
pub struct SceneManager {
    stage: Stage,
    events: EventBus,
    timers: Timers,
    content: ContentQueue,
    audio: Box<dyn AudioSink>,
    viewport: Viewport,
    epoch: Epoch,

    scenes: Vec<Registered>,
    current: Option<usize>,
    navigation: Vec<String>,
}

impl SceneManager {
    pub fn new(content: Box<dyn ContentSource>, audio: Box<dyn AudioSink>) -> Self {
        Self {
            stage: Stage::new(),
            events: EventBus::new(),
            timers: Timers::new(),
            content: ContentQueue::new(content),
            audio,
            viewport: Viewport::new(800.0, 600.0),
            epoch: Epoch::ZERO,
            scenes: Vec::new(),
            current: None,
            navigation: Vec::new(),
        }
    }

    /// Registers `scene` under `name` and allocates its root container.
    ///
    /// Names are unique; a second registration under the same name is rejected
    /// and leaves the first one in place.
    pub fn register(&mut self, name: impl Into<String>, scene: Box<dyn Scene>) -> Result<(), SceneError> {
        let name = name.into();
        if self.index_of(&name).is_some() {
            return Err(SceneError::AlreadyRegistered(name));
        }
        let root = self.stage.spawn(Node::container());
        log::debug!("scene: registered {name:?}");
        self.scenes.push(Registered { name, root, scene });
        Ok(())
    }

    /// Makes `name` the active scene.
    ///
    /// The previous scene is destroyed (errors are logged, never fatal), its
    /// root detached and anything it leaked swept before the new scene's
    /// `init` runs. An unknown name changes nothing.
    pub fn activate(&mut self, name: &str) -> Result<(), SceneError> {
        let Some(next) = self.index_of(name) else {
            log::error!("scene: {name:?} not found; staying on {:?}", self.current());
            return Err(SceneError::NotFound(name.to_string()));
        };

        let old_epoch = self.epoch;
        self.epoch = old_epoch.next();

        if let Some(prev) = self.current.take() {
            log::info!("scene: leaving {:?}", self.scenes[prev].name);
            if let Err(err) = self.call(prev, old_epoch, |scene, ctx| scene.destroy(ctx)) {
                log::error!("scene: {:?} destroy failed: {err:#}", self.scenes[prev].name);
            }
            self.stage.detach(self.scenes[prev].root);
        }
        self.sweep();

        self.current = Some(next);
        let root = self.stage.root();
        self.stage.add_child(root, self.scenes[next].root);

        log::info!("scene: entering {name:?} at epoch {}", self.epoch);
        let epoch = self.epoch;
        if let Err(err) = self.call(next, epoch, |scene, ctx| scene.init(ctx)) {
            let reason = format!("{err:#}");
            log::error!("scene: {name:?} init failed: {reason}");
            return Err(SceneError::InitFailed { name: name.to_string(), reason });
        }
        Ok(())
    }

    /// Releases whatever the previous activation left behind.
    fn sweep(&mut self) {
        let listeners = self.events.sweep(self.epoch);
        let timers = self.timers.sweep(self.epoch);

        let mut nodes = 0;
        for entry in &self.scenes {
            // Only the active scene's root is attached; leftovers under the
            // others belong to scenes that are no longer running.
            if !self.stage.is_attached(entry.root) {
                nodes += self.stage.destroy_children(entry.root);
            }
        }
        let roots: Vec<NodeId> = self.scenes.iter().map(|s| s.root).collect();
        nodes += self.stage.sweep_unreachable(&roots);

        if listeners + timers + nodes > 0 {
            log::warn!("scene: swept {listeners} listeners, {timers} timers, {nodes} nodes left by the previous scene");
        }
    }

    /// Name of the active scene.
    pub fn current(&self) -> Option<&str> {
        self.current.map(|i| self.scenes[i].name.as_str())
    }

    pub fn current_scene(&self) -> Option<&dyn Scene> {
        self.current.map(|i| self.scenes[i].scene.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|s| s.name.as_str())
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn audio(&self) -> &dyn AudioSink {
        self.audio.as_ref()
    }

    pub fn content_in_flight(&self) -> usize {
        self.content.in_flight()
    }

    // ── per-frame dispatch ────────────────────────────────────────────────

    /// Calls the active scene's `update`. Errors are logged; the loop goes on.
    pub fn update(&mut self, elapsed_ms: f32) {
        self.with_current("update", |scene, ctx| scene.update(elapsed_ms, ctx));
    }

    /// Routes a host signal to the active scene's listeners.
    pub fn dispatch(&mut self, signal: HostSignal) {
        if let HostSignal::Resized(viewport) = signal {
            self.viewport = viewport;
        }
        let Some(current) = self.current else { return };

        let deliveries = self.events.route(signal, &self.stage, self.epoch);
        for delivery in deliveries {
            // An earlier handler in this batch may have unsubscribed it.
            if !self.events.contains(delivery.listener) {
                continue;
            }
            let epoch = self.epoch;
            let result = self.call(current, epoch, |scene, ctx| {
                scene.on_event(delivery.listener, &delivery.event, ctx)
            });
            self.log_failure("on_event", result);
        }
    }

    /// Same as dispatching [`HostSignal::Resized`].
    pub fn resize(&mut self, viewport: Viewport) {
        self.dispatch(HostSignal::Resized(viewport));
    }

    /// Advances timers and delivers those armed during the current activation.
    pub fn advance_timers(&mut self, elapsed_ms: f32) {
        let fired = self.timers.advance(elapsed_ms);
        for f in fired {
            // An earlier handler in this batch may have cancelled it.
            if !self.timers.claim(f.id) || f.epoch != self.epoch {
                continue;
            }
            let Some(current) = self.current else { continue };
            let epoch = self.epoch;
            let result = self.call(current, epoch, |scene, ctx| scene.on_timer(f.id, ctx));
            self.log_failure("on_timer", result);
        }
    }

    /// Delivers finished content requests. Completions issued under another
    /// epoch are discarded before any scene sees them.
    pub fn poll_content(&mut self) {
        for (ticket, result) in self.content.drain() {
            if ticket.epoch() != self.epoch {
                log::debug!(
                    "content: discarding stale completion {} from epoch {} (now {})",
                    ticket.id(),
                    ticket.epoch(),
                    self.epoch
                );
                continue;
            }
            let Some(current) = self.current else { continue };
            let epoch = self.epoch;
            let result = self.call(current, epoch, |scene, ctx| scene.on_content(ticket, result, ctx));
            self.log_failure("on_content", result);
        }
    }

    /// Applies transitions requested through [`SceneCtx::navigate`], in order.
    pub fn apply_navigation(&mut self) {
        let mut hops = 0;
        while !self.navigation.is_empty() {
            let requests = std::mem::take(&mut self.navigation);
            for name in requests {
                if hops == MAX_HOPS {
                    log::error!("scene: dropping navigation to {name:?}; too many transitions in one frame");
                    continue;
                }
                hops += 1;
                // Failures are logged by `activate`.
                let _ = self.activate(&name);
            }
        }
    }

    /// Requests queued and not yet applied.
    pub fn pending_navigation(&self) -> &[String] {
        &self.navigation
    }

    /// Flattens the stage into `list` (cleared first).
    pub fn compose(&self, list: &mut DrawList) {
        list.clear();
        self.stage.compose(list);
    }

    // ── helpers ───────────────────────────────────────────────────────────

    fn index_of(&self, name: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.name == name)
    }

    fn with_current<F>(&mut self, what: &str, f: F)
    where
        F: FnOnce(&mut dyn Scene, &mut SceneCtx<'_>) -> Result<()>,
    {
        let Some(current) = self.current else { return };
        let epoch = self.epoch;
        let result = self.call(current, epoch, f);
        self.log_failure(what, result);
    }

    fn log_failure(&self, what: &str, result: Result<()>) {
        if let Err(err) = result {
            log::error!("scene: {:?} {what} failed: {err:#}", self.current().unwrap_or("?"));
        }
    }

    fn call<R, F>(&mut self, index: usize, epoch: Epoch, f: F) -> R
    where
        F: FnOnce(&mut dyn Scene, &mut SceneCtx<'_>) -> R,
    {
        let Self { stage, events, timers, content, audio, viewport, scenes, navigation, .. } = self;
        let entry = &mut scenes[index];
        let mut ctx = SceneCtx {
            stage,
            root: entry.root,
            events,
            timers,
            content,
            audio: audio.as_mut(),
            viewport: *viewport,
            epoch,
            navigation,
        };
        f(entry.scene.as_mut(), &mut ctx)
    }
}
