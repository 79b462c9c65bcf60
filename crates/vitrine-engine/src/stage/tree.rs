use slotmap::SlotMap;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::{Node, NodeId, NodeKind};

/// Translate + scale transform from a node's local space to stage space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub offset: Vec2,
    pub scale: Vec2,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { offset: Vec2::zero(), scale: Vec2::splat(1.0) };

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        self.offset + p.scale(self.scale)
    }

    #[inline]
    pub fn apply_rect(self, r: Rect) -> Rect {
        let min = self.apply(r.min());
        let max = self.apply(r.max());
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y).normalized()
    }

    /// Transform of a child node expressed through this (parent) transform.
    #[inline]
    pub fn child(self, node: &Node) -> Transform {
        let local_offset = node.position - node.pivot.scale(node.scale);
        Transform {
            offset: self.apply(local_offset),
            scale: node.scale.scale(self.scale),
        }
    }
}

/// Retained node tree that scenes build their visual content in.
///
/// The stage owns every node. Scenes hold [`NodeId`] handles; a node is drawn
/// only while it is reachable from [`Stage::root`]. Detaching a subtree keeps
/// its nodes alive; [`Stage::destroy`] releases them.
pub struct Stage {
    pub(super) nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Stage {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::container());
        Self { nodes, root }
    }

    /// The surface root. Scene roots are attached here while active.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, including the surface root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Children of `id` in insertion order. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Creates a detached node.
    pub fn spawn(&mut self, node: Node) -> NodeId {
        let mut node = node;
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    /// Creates a node and appends it to `parent`.
    ///
    /// If `parent` is gone the node stays detached (and still counts as live).
    pub fn insert(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.spawn(node);
        if !self.add_child(parent, id) {
            log::warn!("stage: insert under missing parent {parent:?}; node left detached");
        }
        id
    }

    /// Appends `child` to `parent`, detaching it from any previous parent first.
    ///
    /// Returns `false` (and changes nothing) if either node is missing or the
    /// move would create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.is_ancestor(child, parent) {
            return false;
        }

        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    /// Removes `child` from its parent. The subtree stays alive.
    pub fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.nodes.get(child).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        self.nodes[child].parent = None;
        true
    }

    /// Destroys `id` and its whole subtree. Returns the number of nodes released.
    ///
    /// The surface root cannot be destroyed; use [`Stage::destroy_children`].
    pub fn destroy(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.contains(id) {
            return 0;
        }
        self.detach(id);

        let mut released = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                released += 1;
            }
        }
        released
    }

    /// Destroys every descendant of `id`, keeping `id` itself.
    pub fn destroy_children(&mut self, id: NodeId) -> usize {
        let children = match self.nodes.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return 0,
        };
        let mut released = 0;
        for child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
            released += self.destroy(child);
        }
        released
    }

    /// Destroys every node that is neither reachable from the surface root nor
    /// inside one of the `keep` subtrees. Returns the number released.
    ///
    /// Used to reclaim nodes a scene created detached and never attached.
    pub fn sweep_unreachable(&mut self, keep: &[NodeId]) -> usize {
        let mut live = std::collections::HashSet::new();
        let mut stack: Vec<NodeId> = std::iter::once(self.root).chain(keep.iter().copied()).collect();
        while let Some(next) = stack.pop() {
            if self.contains(next) && live.insert(next) {
                stack.extend_from_slice(self.children(next));
            }
        }

        let before = self.nodes.len();
        self.nodes.retain(|id, _| live.contains(&id));
        for id in keep {
            let orphaned = self.nodes.get(*id).and_then(|n| n.parent).is_some_and(|p| !self.nodes.contains_key(p));
            if orphaned {
                self.nodes[*id].parent = None;
            }
        }
        before - self.nodes.len()
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    pub fn subtree_len(&self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            count += 1;
            stack.extend_from_slice(self.children(next));
        }
        count
    }

    /// `true` if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// `true` if `id` is reachable from the surface root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor(self.root, id)
    }

    // ── convenience setters ───────────────────────────────────────────────
    //
    // Missing ids are ignored: scenes routinely touch nodes that a relayout
    // raced with teardown, and that must not be an error.

    pub fn set_position(&mut self, id: NodeId, pos: Vec2) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.position = pos;
        }
    }

    pub fn set_scale(&mut self, id: NodeId, s: f32) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.scale = Vec2::splat(s);
        }
    }

    pub fn set_alpha(&mut self, id: NodeId, alpha: f32) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.alpha = alpha;
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.visible = visible;
        }
    }

    pub fn set_tint(&mut self, id: NodeId, tint: Color) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.tint = tint;
        }
    }

    pub fn set_z(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.z_index = z;
        }
    }

    /// Replaces the content of a text node. No-op for other kinds.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(Node { kind: NodeKind::Text { content, .. }, .. }) = self.nodes.get_mut(id) {
            *content = text.into();
        }
    }

    /// Resizes a rect or image node. No-op for other kinds.
    pub fn set_size(&mut self, id: NodeId, new_size: Vec2) {
        match self.nodes.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Rect { size, .. }) | Some(NodeKind::Image { size, .. }) => {
                *size = new_size;
            }
            _ => {}
        }
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Transform from `id`'s local space to stage space.
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.nodes.get(current)?;
            chain.push(current);
            cursor = node.parent;
        }

        let mut t = Transform::IDENTITY;
        for id in chain.iter().rev() {
            t = t.child(&self.nodes[*id]);
        }
        Some(t)
    }

    /// Bounds of `id` and its descendants in `id`'s local space.
    pub fn local_bounds(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        let mut bounds = node.content_bounds();
        for child in &node.children {
            let Some(c) = self.nodes.get(*child) else { continue };
            if !c.visible {
                continue;
            }
            let Some(child_bounds) = self.local_bounds(*child) else { continue };
            let placed = Transform::IDENTITY.child(c).apply_rect(child_bounds);
            bounds = Some(match bounds {
                Some(b) => b.union(placed),
                None => placed,
            });
        }
        bounds
    }

    /// Bounds of `id` and its descendants in stage space.
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        let local = self.local_bounds(id)?;
        Some(self.world_transform(id)?.apply_rect(local))
    }

    /// Scaled size of a node's subtree, the way `width`/`height` read on a sprite.
    pub fn size(&self, id: NodeId) -> Vec2 {
        let Some(node) = self.nodes.get(id) else { return Vec2::zero() };
        self.local_bounds(id)
            .map(|b| b.size.scale(node.scale))
            .unwrap_or_default()
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}
