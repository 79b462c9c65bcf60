use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::{DrawList, ZIndex};

/// Stroke drawn along the outer edge of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// Rectangle payload. `corner_radius == 0` is a plain rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub corner_radius: f32,
    pub color: Color,
    pub border: Option<Border>,
}

/// Circle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Text payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// Font size in logical pixels, already scaled.
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    /// Top-left of the text block in logical pixels.
    pub origin: Vec2,
    /// Wrapping width in logical pixels. `None` = no wrapping.
    pub max_width: Option<f32>,
    /// Stroke around glyphs, used for the numbered cards.
    pub stroke: Option<Border>,
}

/// Image payload. `source` is the asset path or URL the renderer resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub source: String,
    pub rect: Rect,
    pub tint: Color,
}

/// Renderer-agnostic draw command stream.
///
/// Extending the stream:
/// - add a payload struct here
/// - add a new variant
/// - add a push helper on `DrawList`
/// - teach the stage's compose pass to emit it
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
    Text(TextCmd),
    Image(ImageCmd),
}

impl DrawList {
    /// Records a (possibly rounded) rectangle.
    #[inline]
    pub fn push_rect(
        &mut self,
        z: ZIndex,
        rect: Rect,
        corner_radius: f32,
        color: Color,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, corner_radius, color, border }));
    }

    /// Records a solid circle.
    #[inline]
    pub fn push_circle(&mut self, z: ZIndex, center: Vec2, radius: f32, color: Color) {
        self.push(z, DrawCmd::Circle(CircleCmd { center, radius, color }));
    }

    /// Records a text block.
    #[inline]
    pub fn push_text(&mut self, z: ZIndex, cmd: TextCmd) {
        self.push(z, DrawCmd::Text(cmd));
    }

    /// Records an image sprite.
    #[inline]
    pub fn push_image(&mut self, z: ZIndex, source: impl Into<String>, rect: Rect, tint: Color) {
        self.push(z, DrawCmd::Image(ImageCmd { source: source.into(), rect, tint }));
    }
}
