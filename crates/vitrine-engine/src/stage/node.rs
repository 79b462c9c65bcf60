use crate::coords::{Rect, Vec2};
use crate::draw::Border;
use crate::paint::Color;

slotmap::new_key_type! {
    /// Handle to a node owned by a [`Stage`](super::Stage).
    ///
    /// Handles are generational: a handle to a destroyed node never aliases a
    /// node created later.
    pub struct NodeId;
}

/// Text appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    /// Wrap width in local pixels. `None` = single line.
    pub wrap_width: Option<f32>,
    pub stroke: Option<Border>,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self { size, color, bold: false, wrap_width: None, stroke: None }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn wrap(mut self, width: f32) -> Self {
        self.wrap_width = Some(width);
        self
    }

    pub fn stroke(mut self, border: Border) -> Self {
        self.stroke = Some(border);
        self
    }
}

/// Node content.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Groups children; has no content of its own.
    Container,
    Rect {
        size: Vec2,
        corner_radius: f32,
        color: Color,
        border: Option<Border>,
    },
    /// Centered on the node origin.
    Circle { radius: f32, color: Color },
    Text { content: String, style: TextStyle },
    /// Sprite resolved by the renderer from `source`.
    Image { source: String, size: Vec2 },
}

/// A stage node: content + local transform + interaction flags.
///
/// Local transform: a local point `p` lands at `position + (p - pivot) * scale`
/// in the parent's space. Leaf content is placed so that `anchor` (a fraction
/// of its own size) sits on the local origin.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Vec2,
    pub pivot: Vec2,
    pub anchor: Vec2,
    pub scale: Vec2,
    pub alpha: f32,
    pub tint: Color,
    pub visible: bool,
    pub z_index: i32,
    /// Receives pointer routing (hover/press/tap).
    pub interactive: bool,
    /// Local hit rect overriding the content bounds.
    pub hit_area: Option<Rect>,
    /// Local clip rect applied to this node's children.
    pub mask: Option<Rect>,

    pub(crate) parent: Option<super::NodeId>,
    pub(crate) children: Vec<super::NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            position: Vec2::zero(),
            pivot: Vec2::zero(),
            anchor: Vec2::zero(),
            scale: Vec2::splat(1.0),
            alpha: 1.0,
            tint: Color::WHITE,
            visible: true,
            z_index: 0,
            interactive: false,
            hit_area: None,
            mask: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn container() -> Self {
        Self::new(NodeKind::Container)
    }

    pub fn rect(size: Vec2, color: Color) -> Self {
        Self::new(NodeKind::Rect { size, corner_radius: 0.0, color, border: None })
    }

    pub fn rounded_rect(size: Vec2, corner_radius: f32, color: Color) -> Self {
        Self::new(NodeKind::Rect { size, corner_radius, color, border: None })
    }

    pub fn circle(radius: f32, color: Color) -> Self {
        Self::new(NodeKind::Circle { radius, color })
    }

    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Self::new(NodeKind::Text { content: content.into(), style })
    }

    pub fn image(source: impl Into<String>, size: Vec2) -> Self {
        Self::new(NodeKind::Image { source: source.into(), size })
    }

    // ── builder helpers ───────────────────────────────────────────────────

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.anchor = Vec2::new(x, y);
        self
    }

    pub fn with_pivot(mut self, x: f32, y: f32) -> Self {
        self.pivot = Vec2::new(x, y);
        self
    }

    pub fn with_scale(mut self, s: f32) -> Self {
        self.scale = Vec2::splat(s);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    pub fn with_border(mut self, b: Border) -> Self {
        if let NodeKind::Rect { border, .. } = &mut self.kind {
            *border = Some(b);
        }
        self
    }

    pub fn with_hit_area(mut self, rect: Rect) -> Self {
        self.hit_area = Some(rect);
        self
    }

    pub fn with_mask(mut self, rect: Rect) -> Self {
        self.mask = Some(rect);
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn parent(&self) -> Option<super::NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[super::NodeId] {
        &self.children
    }

    /// Content box in local space, before the node's own transform.
    ///
    /// `None` for containers; their bounds come from their children.
    pub fn content_bounds(&self) -> Option<Rect> {
        let size = match &self.kind {
            NodeKind::Container => return None,
            NodeKind::Circle { radius, .. } => {
                return Some(Rect::new(-radius, -radius, radius * 2.0, radius * 2.0));
            }
            NodeKind::Rect { size, .. } | NodeKind::Image { size, .. } => *size,
            NodeKind::Text { content, style } => super::measure_text(content, style),
        };
        let origin = Vec2::new(-self.anchor.x * size.x, -self.anchor.y * size.y);
        Some(Rect::from_origin_size(origin, size))
    }
}
