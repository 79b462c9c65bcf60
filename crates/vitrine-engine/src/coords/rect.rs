use super::Vec2;

/// Axis-aligned box, top-left `origin` plus `size`, in logical pixels.
///
/// Hit areas, masks and node bounds all use this type. Operations accept
/// boxes with negative sizes and treat them as their normalized form.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self::from_origin_size(min, max - min)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Same box with non-negative width and height.
    pub fn normalized(self) -> Self {
        let (a, b) = (self.min(), self.max());
        Self::from_corners(Vec2::new(a.x.min(b.x), a.y.min(b.y)), Vec2::new(a.x.max(b.x), a.y.max(b.y)))
    }

    /// Left and top edges are inside, right and bottom edges are not.
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        (r.origin.x..max.x).contains(&p.x) && (r.origin.y..max.y).contains(&p.y)
    }

    /// Overlap of two boxes; `None` when they only touch or are apart.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let (a, b) = (self.normalized(), other.normalized());
        let min = Vec2::new(a.origin.x.max(b.origin.x), a.origin.y.max(b.origin.y));
        let max = Vec2::new(a.max().x.min(b.max().x), a.max().y.min(b.max().y));
        let r = Self::from_corners(min, max);
        (!r.is_empty()).then_some(r)
    }

    /// Smallest box covering both.
    pub fn union(self, other: Rect) -> Rect {
        let (a, b) = (self.normalized(), other.normalized());
        Self::from_corners(
            Vec2::new(a.origin.x.min(b.origin.x), a.origin.y.min(b.origin.y)),
            Vec2::new(a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_sizes_normalize() {
        assert_eq!(Rect::new(10.0, 10.0, -4.0, -6.0).normalized(), Rect::new(6.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn containment_is_half_open() {
        let r = Rect::new(0.0, 0.0, 150.0, 40.0);
        assert!(r.contains(Vec2::zero()));
        assert!(r.contains(Vec2::new(149.9, 39.9)));
        assert!(!r.contains(Vec2::new(150.0, 20.0)));
        assert!(!r.contains(Vec2::new(20.0, -0.1)));
    }

    #[test]
    fn hit_area_with_negative_origin() {
        let padded = Rect::new(-20.0, -20.0, 190.0, 80.0);
        assert!(padded.contains(Vec2::new(-10.0, 50.0)));
    }

    #[test]
    fn overlap_and_cover() {
        let window = Rect::new(0.0, 100.0, 800.0, 480.0);
        let row = Rect::new(50.0, 500.0, 300.0, 200.0);
        assert_eq!(window.intersect(row), Some(Rect::new(50.0, 500.0, 300.0, 80.0)));
        assert_eq!(window.union(row), Rect::new(0.0, 100.0, 800.0, 600.0));
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(Rect::new(10.0, 0.0, 10.0, 10.0)), None);
        assert_eq!(a.intersect(Rect::new(30.0, 30.0, 1.0, 1.0)), None);
    }
}
