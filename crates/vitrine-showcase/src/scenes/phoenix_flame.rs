use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vitrine_ui::prelude::*;

use super::GAME_SELECT;

const MAX_PARTICLES: usize = 10;
const COLORS: [u32; 5] = [0xffc300, 0xff5733, 0xff9000, 0xfff200, 0xff6f00];
const FIRE_SOUND: &str = "assets/sounds/fire.mp3";

/// Per-particle motion, advanced with the frame's elapsed milliseconds.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Particle {
    position: Vec2,
    velocity: Vec2,
    scale: f32,
    alpha: f32,
    life: f32,
    max_life: f32,
    grow: f32,
    fade: f32,
}

impl Particle {
    /// Fresh particle near the bottom center of the window.
    fn spawn(vp: Viewport, rng: &mut impl Rng) -> Self {
        let base = Vec2::new(vp.width / 2.0, vp.height - 120.0);
        Self {
            position: base + Vec2::new((rng.r#gen::<f32>() - 0.5) * 80.0, rng.r#gen::<f32>() * 40.0),
            velocity: Vec2::new((rng.r#gen::<f32>() - 0.5) * 1.2, -2.5 - rng.r#gen::<f32>() * 1.5),
            scale: 0.7 + rng.r#gen::<f32>() * 0.5,
            alpha: 0.8 + rng.r#gen::<f32>() * 0.2,
            life: 0.0,
            max_life: 60.0 + rng.r#gen::<f32>() * 40.0,
            grow: 0.008 + rng.r#gen::<f32>() * 0.012,
            fade: 0.012 + rng.r#gen::<f32>() * 0.008,
        }
    }

    /// Moves, grows and fades the particle. Returns `false` once it has burnt out.
    fn step(&mut self, elapsed_ms: f32) -> bool {
        self.position = self.position + self.velocity * (elapsed_ms * 0.8);
        self.scale += self.grow * elapsed_ms;
        self.alpha -= self.fade * elapsed_ms;
        self.life += elapsed_ms;
        self.life <= self.max_life && self.alpha > 0.0
    }
}

/// A small flame built from at most ten glowing particles, with a looping
/// fire sound.
pub struct PhoenixFlameScene {
    rng: StdRng,
    fps: FpsCounter,
    listeners: ListenerSet,
    back: Option<Button>,
    layer: Option<NodeId>,
    particles: Vec<(NodeId, Particle)>,
    sound: Option<SoundId>,
}

impl PhoenixFlameScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            fps: FpsCounter::new(),
            listeners: ListenerSet::new(),
            back: None,
            layer: None,
            particles: Vec::with_capacity(MAX_PARTICLES),
            sound: None,
        }
    }

    fn spawn_particle(&mut self, ctx: &mut SceneCtx<'_>) {
        let Some(layer) = self.layer else { return };
        let p = Particle::spawn(ctx.viewport, &mut self.rng);
        let color = COLORS[self.rng.gen_range(0..COLORS.len())];

        let node = ctx.add_to(
            layer,
            Node::container().at(p.position.x, p.position.y).with_scale(p.scale).with_alpha(p.alpha),
        );
        ctx.add_to(node, Node::circle(24.0, Color::from_hex(color)).with_alpha(0.8));
        ctx.add_to(node, Node::circle(12.0, Color::WHITE).with_alpha(0.2));
        self.particles.push((node, p));
    }

    fn stop_sound(&mut self, ctx: &mut SceneCtx<'_>) {
        if let Some(sound) = self.sound.take() {
            ctx.audio.stop(sound);
        }
    }
}

impl Default for PhoenixFlameScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PhoenixFlameScene {
    fn init(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.particles.clear();
        self.layer = Some(ctx.add(Node::container()));

        let root = ctx.root;
        let back = Button::spawn(ctx, root, "Back to Menu");
        super::place_back_button(ctx, &back);
        self.back = Some(back);

        for _ in 0..MAX_PARTICLES {
            self.spawn_particle(ctx);
        }

        self.sound = Some(ctx.audio.play(&SoundCue::new(FIRE_SOUND).volume(0.4).looping()));
        self.fps.attach(ctx);
        self.listeners.on(ctx, SignalKind::Resize);
        Ok(())
    }

    fn update(&mut self, elapsed_ms: f32, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.fps.update(ctx.stage, elapsed_ms);

        let stage = &mut *ctx.stage;
        self.particles.retain_mut(|(node, p)| {
            let alive = p.step(elapsed_ms);
            if alive {
                stage.set_position(*node, p.position);
                stage.set_scale(*node, p.scale);
                stage.set_alpha(*node, p.alpha);
            } else {
                stage.destroy(*node);
            }
            alive
        });

        if self.particles.len() < MAX_PARTICLES {
            self.spawn_particle(ctx);
        }
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut SceneCtx<'_>) -> Result<()> {
        self.stop_sound(ctx);
        self.listeners.release(ctx.events);
        if let Some(mut back) = self.back.take() {
            back.destroy(ctx.stage, ctx.events);
        }
        ctx.stage.destroy_children(ctx.root);
        self.layer = None;
        self.particles.clear();
        self.fps.detach();
        Ok(())
    }

    fn on_event(&mut self, listener: ListenerId, event: &Event, ctx: &mut SceneCtx<'_>) -> Result<()> {
        if let Event::Resize(_) = event {
            if let Some(back) = &self.back {
                super::place_back_button(ctx, back);
            }
            return Ok(());
        }
        let Some(back) = self.back.as_mut() else { return Ok(()) };
        if back.handle(ctx, listener, event) == Some(ButtonEvent::Click) {
            self.stop_sound(ctx);
            ctx.navigate(GAME_SELECT);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing;

    fn flame() -> vitrine_ui::SceneManager {
        testing::run("phoenixflame", Box::new(PhoenixFlameScene::with_seed(3)), &[GAME_SELECT])
    }

    fn particle_count(m: &vitrine_ui::SceneManager) -> usize {
        let scene_root = m.stage().children(m.stage().root())[0];
        let layer = m.stage().children(scene_root)[0];
        m.stage().children(layer).len()
    }

    // ── particles ─────────────────────────────────────────────────────────

    #[test]
    fn spawn_stays_near_the_base() {
        let mut rng = StdRng::seed_from_u64(9);
        let vp = Viewport::new(1000.0, 800.0);
        for _ in 0..100 {
            let p = Particle::spawn(vp, &mut rng);
            assert!((460.0..=540.0).contains(&p.position.x));
            assert!((680.0..=720.0).contains(&p.position.y));
            assert!(p.velocity.y <= -2.5 && p.velocity.y >= -4.0);
            assert!((0.8..=1.0).contains(&p.alpha));
        }
    }

    #[test]
    fn step_rises_grows_and_fades() {
        let mut p = Particle {
            position: Vec2::new(0.0, 100.0),
            velocity: Vec2::new(1.0, -2.5),
            scale: 1.0,
            alpha: 1.0,
            life: 0.0,
            max_life: 80.0,
            grow: 0.0625,
            fade: 0.015625,
        };
        assert!(p.step(10.0));
        assert_eq!(p.position, Vec2::new(8.0, 80.0));
        assert_eq!(p.scale, 1.625);
        assert_eq!(p.alpha, 0.84375);
        assert_eq!(p.life, 10.0);
    }

    #[test]
    fn particle_burns_out_by_life_or_alpha() {
        let base = Particle {
            position: Vec2::zero(),
            velocity: Vec2::zero(),
            scale: 1.0,
            alpha: 1.0,
            life: 0.0,
            max_life: 60.0,
            grow: 0.0,
            fade: 0.0,
        };
        let mut old = base;
        assert!(!old.step(61.0));

        let mut faded = Particle { fade: 0.03, max_life: 1000.0, ..base };
        assert!(!faded.step(50.0));
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn starts_with_a_full_flame_and_sound() {
        let m = flame();
        assert_eq!(particle_count(&m), MAX_PARTICLES);
        assert_eq!(m.audio().playing(), 1);
    }

    #[test]
    fn particle_count_stays_bounded() {
        let mut m = flame();
        let nodes = m.stage().len();
        for _ in 0..50 {
            testing::frames(&mut m, 1, 16.0);
            assert!(particle_count(&m) <= MAX_PARTICLES);
        }
        assert!(m.stage().len() <= nodes);
    }

    #[test]
    fn leaving_stops_the_sound() {
        let mut m = flame();
        m.activate(GAME_SELECT).unwrap();
        assert_eq!(m.audio().playing(), 0);
    }

    #[test]
    fn back_stops_the_sound_and_navigates() {
        let mut m = flame();
        let label = testing::find_text(m.stage(), "Back to Menu").unwrap();
        let back = m.stage().get(label).unwrap().parent().unwrap();
        let at = testing::center_of(m.stage(), back);
        testing::tap(&mut m, at);
        assert_eq!(m.current(), Some(GAME_SELECT));
        assert_eq!(m.audio().playing(), 0);
    }
}
