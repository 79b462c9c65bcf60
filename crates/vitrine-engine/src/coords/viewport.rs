use super::Vec2;

/// Logical size of the window's drawable area.
///
/// Scenes read it from their context and get a `Resize` signal whenever it
/// changes.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}
