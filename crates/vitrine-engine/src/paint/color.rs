/// RGBA with premultiplied alpha, components in `0.0..=1.0`.
///
/// Scenes write colors as `0xRRGGBB` literals; alpha usually comes from node
/// opacity through [`fade`](Color::fade).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn from_hex(rgb: u32) -> Self {
        Self::from_hex_alpha(rgb, 1.0)
    }

    /// `0xRRGGBB` with a straight (not premultiplied) alpha.
    pub fn from_hex_alpha(rgb: u32, alpha: f32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
        let a = alpha.clamp(0.0, 1.0);
        Self { r: channel(16) * a, g: channel(8) * a, b: channel(0) * a, a }
    }

    /// Un-premultiplied `(r, g, b, a)`. Fully transparent colors come back as zeros.
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            return (0.0, 0.0, 0.0, 0.0);
        }
        (self.r / self.a, self.g / self.a, self.b / self.a, self.a)
    }

    /// Multiplies opacity by `factor`, clamped to `0.0..=1.0`.
    pub fn fade(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self { r: self.r * f, g: self.g * f, b: self.b * f, a: self.a * f }
    }

    /// Sprite-style tint: rgb multiplied by the tint's straight rgb.
    pub fn tinted(self, tint: Color) -> Self {
        let (tr, tg, tb, _) = tint.to_straight();
        Self { r: self.r * tr, g: self.g * tg, b: self.b * tb, a: self.a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn from_hex_splits_channels() {
        let c = Color::from_hex(0xff9000);
        assert!(close(c.r, 1.0));
        assert!(close(c.g, 144.0 / 255.0));
        assert!(close(c.b, 0.0));
        assert!(close(c.a, 1.0));
    }

    #[test]
    fn from_hex_alpha_premultiplies() {
        let c = Color::from_hex_alpha(0xffffff, 0.5);
        assert!(close(c.r, 0.5));
        assert!(close(c.a, 0.5));
    }

    #[test]
    fn fade_keeps_premultiplication() {
        let c = Color::from_hex(0x23234a).fade(0.25);
        let (_, _, b, a) = c.to_straight();
        assert!(close(a, 0.25));
        assert!(close(b, 0x4a as f32 / 255.0));
    }

    #[test]
    fn white_tint_is_identity() {
        let c = Color::from_hex(0x4a4a4a);
        assert_eq!(c.tinted(Color::WHITE), c);
    }
}
