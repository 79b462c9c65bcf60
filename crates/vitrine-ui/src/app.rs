use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use vitrine_engine::coords::Viewport;
use vitrine_engine::core::{App as EngineApp, AppControl, FrameCtx};
use vitrine_engine::device::GpuInit;
use vitrine_engine::draw::DrawList;
use vitrine_engine::events::HostSignal;
use vitrine_engine::paint::Color;
use vitrine_engine::render::{NullRenderer, StageRenderer};
use vitrine_engine::window::{CursorIcon, Runtime, RuntimeConfig};

use crate::audio::{AudioSink, LogAudioSink};
use crate::content::{ContentSource, NoContent};
use crate::driver::FrameDriver;
use crate::manager::SceneManager;
use crate::scene::Scene;

/// Background behind every scene.
pub const DEFAULT_CLEAR: u32 = 0x2b2b40;

// ── Application ───────────────────────────────────────────────────────────

/// Top-level application builder.
///
/// Register scenes by name, pick the one to start with, then call [`run`].
///
/// ```rust,ignore
/// Application::new()
///     .title("Showcase")
///     .scene("start", Box::new(StartScene::new()))
///     .scene("gameselect", Box::new(GameSelectScene::new()))
///     .initial_scene("start")
///     .run()?;
/// ```
///
/// [`run`]: Application::run
pub struct Application {
    title: String,
    width: f64,
    height: f64,
    clear: Color,
    scenes: Vec<(String, Box<dyn Scene>)>,
    initial: Option<String>,
    content: Box<dyn ContentSource>,
    audio: Box<dyn AudioSink>,
    renderer: Box<dyn StageRenderer>,
    gpu: GpuInit,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title: "vitrine".to_string(),
            width: 1280.0,
            height: 720.0,
            clear: Color::from_hex(DEFAULT_CLEAR),
            scenes: Vec::new(),
            initial: None,
            content: Box::new(NoContent),
            audio: Box::new(LogAudioSink::default()),
            renderer: Box::new(NullRenderer),
            gpu: GpuInit::default(),
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear = color;
        self
    }

    /// Registers a scene. Duplicate names fail when [`run`](Self::run) starts.
    pub fn scene(mut self, name: impl Into<String>, scene: Box<dyn Scene>) -> Self {
        self.scenes.push((name.into(), scene));
        self
    }

    /// Scene to activate once the window is up. Defaults to the first one registered.
    pub fn initial_scene(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    pub fn content_source(mut self, source: Box<dyn ContentSource>) -> Self {
        self.content = source;
        self
    }

    pub fn audio_sink(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio = sink;
        self
    }

    pub fn renderer(mut self, renderer: Box<dyn StageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn gpu_init(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    // ── Entry point ───────────────────────────────────────────────────────

    /// Opens the window and runs scenes until it closes.
    pub fn run(self) -> Result<()> {
        let config = RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let gpu = self.gpu.clone();
        let state = UiAppState::new(self)?;
        Runtime::run(config, gpu, state)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── UiAppState ────────────────────────────────────────────────────────────

/// Bridges the scene manager to `vitrine_engine::core::App`.
struct UiAppState {
    manager: SceneManager,
    driver: FrameDriver,
    initial: String,
    started: bool,

    clear: Color,
    renderer: Box<dyn StageRenderer>,
    draw_list: DrawList,

    /// Resizes reported between frames, delivered at the start of the next one.
    pending: Vec<HostSignal>,
    signals: Vec<HostSignal>,
    cursor: CursorIcon,
}

impl UiAppState {
    fn new(app: Application) -> Result<Self> {
        let mut manager = SceneManager::new(app.content, app.audio);
        for (name, scene) in app.scenes {
            manager.register(name, scene).context("failed to register scenes")?;
        }

        let initial = match app.initial {
            Some(name) => name,
            None => manager
                .names()
                .next()
                .map(str::to_string)
                .context("no scenes registered")?,
        };
        if !manager.contains(&initial) {
            anyhow::bail!("initial scene {initial:?} is not registered");
        }

        Ok(Self {
            manager,
            driver: FrameDriver::new(),
            initial,
            started: false,
            clear: app.clear,
            renderer: app.renderer,
            draw_list: DrawList::new(),
            pending: Vec::new(),
            signals: Vec::new(),
            cursor: CursorIcon::Default,
        })
    }

    /// Activates the initial scene against the first real viewport.
    fn start(&mut self, viewport: Viewport) {
        self.started = true;
        self.manager.resize(viewport);
        // Failures are logged by the manager; the window stays up.
        let _ = self.manager.activate(&self.initial);
        self.manager.apply_navigation();
    }

    fn collect_signals(&mut self, ctx: &FrameCtx<'_, '_>) {
        self.signals.clear();
        self.signals.append(&mut self.pending);
        let pointer = ctx.input.pointer_pos;
        self.signals.extend(
            ctx.input_frame
                .events
                .iter()
                .filter_map(|ev| HostSignal::from_input(ev, pointer)),
        );
    }

    fn update_cursor(&mut self, ctx: &FrameCtx<'_, '_>) {
        let over_interactive = ctx
            .input
            .pointer_pos
            .is_some_and(|p| self.manager.stage().hit_test(p).is_some());
        let cursor = if over_interactive { CursorIcon::Pointer } else { CursorIcon::Default };
        if cursor != self.cursor {
            self.cursor = cursor;
            ctx.window.set_cursor(cursor);
        }
    }
}

impl EngineApp for UiAppState {
    fn on_resize(&mut self, viewport: Viewport) {
        self.pending.push(HostSignal::Resized(viewport));
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.started {
            self.pending.clear();
            self.start(ctx.window.viewport());
        }

        self.collect_signals(ctx);
        let signals = std::mem::take(&mut self.signals);
        self.driver.frame(&mut self.manager, ctx.time.elapsed_ms, &signals);
        self.signals = signals;

        self.update_cursor(ctx);

        self.manager.compose(&mut self.draw_list);
        let renderer = &mut self.renderer;
        let list = &mut self.draw_list;
        ctx.render(self.clear, |rctx, target| {
            if let Err(err) = renderer.render(rctx, target, list) {
                log::error!("render failed: {err:#}");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneCtx;

    struct Empty;

    impl Scene for Empty {
        fn init(&mut self, _ctx: &mut SceneCtx<'_>) -> Result<()> {
            Ok(())
        }
        fn update(&mut self, _elapsed_ms: f32, _ctx: &mut SceneCtx<'_>) -> Result<()> {
            Ok(())
        }
        fn destroy(&mut self, _ctx: &mut SceneCtx<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn first_scene_is_the_default_initial() {
        let app = Application::new().scene("a", Box::new(Empty)).scene("b", Box::new(Empty));
        let state = UiAppState::new(app).unwrap();
        assert_eq!(state.initial, "a");
        assert_eq!(state.manager.names().count(), 2);
    }

    #[test]
    fn duplicate_scene_names_fail_to_start() {
        let app = Application::new().scene("a", Box::new(Empty)).scene("a", Box::new(Empty));
        assert!(UiAppState::new(app).is_err());
    }

    #[test]
    fn unknown_initial_scene_fails_to_start() {
        let app = Application::new().scene("a", Box::new(Empty)).initial_scene("missing");
        let err = UiAppState::new(app).err().unwrap();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn no_scenes_fail_to_start() {
        assert!(UiAppState::new(Application::new()).is_err());
    }

    #[test]
    fn start_activates_with_the_window_viewport() {
        let app = Application::new().scene("a", Box::new(Empty)).scene("b", Box::new(Empty)).initial_scene("b");
        let mut state = UiAppState::new(app).unwrap();
        state.start(Viewport::new(640.0, 480.0));
        assert_eq!(state.manager.current(), Some("b"));
        assert_eq!(state.manager.viewport(), Viewport::new(640.0, 480.0));
    }
}
