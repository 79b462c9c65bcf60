use crate::coords::Rect;

use super::DrawCmd;

/// Paint layer. Higher layers paint over lower ones.
///
/// The stage composes everything on layer 0 in tree order; node z-indices are
/// already resolved by then.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

/// Orders items by layer, then by the order they were pushed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub seq: u32,
}

/// One recorded command with its ordering key and clip.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
    /// Logical-pixel scissor; `None` draws unclipped.
    pub clip_rect: Option<Rect>,
}

/// A frame's worth of draw commands, as composed from the stage.
///
/// Clips nest: [`push_clip`](Self::push_clip) intersects with the enclosing
/// clip, so masks inside masks only ever shrink the visible area. Paint order
/// is computed lazily and reused until the next push.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    clips: Vec<Rect>,
    order: Vec<usize>,
    order_stale: bool,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the list, keeping its allocations.
    pub fn clear(&mut self) {
        self.items.clear();
        self.clips.clear();
        self.order.clear();
        self.order_stale = true;
    }

    /// Items in the order they were pushed.
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let seq = self.items.len() as u32;
        let clip_rect = self.clips.last().copied();
        self.items.push(DrawItem { key: SortKey { z, seq }, cmd, clip_rect });
        self.order_stale = true;
    }

    /// Clips everything pushed until the matching [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clips.last() {
            Some(outer) => outer.intersect(rect).unwrap_or_default(),
            None => rect,
        };
        self.clips.push(effective);
    }

    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clips.is_empty(), "pop_clip without push_clip");
        self.clips.pop();
    }

    /// Items back to front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.order_stale {
            self.order.clear();
            self.order.extend(0..self.items.len());
            let items = &self.items;
            self.order.sort_unstable_by_key(|&i| items[i].key);
            self.order_stale = false;
        }
        self.order.iter().map(|&i| &self.items[i])
    }
}
