//! Time-based interpolation for scene animations.
//!
//! Tweens are advanced explicitly with the frame's elapsed milliseconds, so
//! they only move while their scene is updated.

use vitrine_engine::coords::Vec2;

/// Quadratic ease-out: fast start, gentle landing.
pub fn power1_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: f32, t: f32) -> f32 {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2::lerp(self, to, t)
    }
}

/// `from -> to` over `duration_ms`, eased with [`power1_out`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration_ms: f32,
    elapsed_ms: f32,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration_ms: f32) -> Self {
        Self { from, to, duration_ms, elapsed_ms: 0.0 }
    }

    /// Moves the tween forward and returns the new value.
    pub fn advance(&mut self, elapsed_ms: f32) -> T {
        self.elapsed_ms = (self.elapsed_ms + elapsed_ms.max(0.0)).min(self.duration_ms);
        self.value()
    }

    pub fn value(&self) -> T {
        self.from.lerp(self.to, power1_out(self.progress()))
    }

    /// `0.0..=1.0`
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 { 1.0 } else { self.elapsed_ms / self.duration_ms }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn target(&self) -> T {
        self.to
    }
}

/// Goes out to `peak` and back to `base` once, each leg lasting `leg_ms`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pulse {
    out: Tween<f32>,
    back: Tween<f32>,
}

impl Pulse {
    pub fn new(base: f32, peak: f32, leg_ms: f32) -> Self {
        Self { out: Tween::new(base, peak, leg_ms), back: Tween::new(peak, base, leg_ms) }
    }

    pub fn advance(&mut self, elapsed_ms: f32) -> f32 {
        if !self.out.is_finished() {
            let before = self.out.elapsed_ms;
            let value = self.out.advance(elapsed_ms);
            let spill = elapsed_ms - (self.out.elapsed_ms - before);
            if spill <= 0.0 {
                return value;
            }
            return self.back.advance(spill);
        }
        self.back.advance(elapsed_ms)
    }

    pub fn is_finished(&self) -> bool {
        self.out.is_finished() && self.back.is_finished()
    }
}
