use crate::coords::{Rect, Vec2};
use crate::draw::{Border, DrawList, TextCmd, ZIndex};

use super::tree::Transform;
use super::{NodeId, NodeKind, Stage};

impl Stage {
    /// Flattens every visible node reachable from the root into `list`.
    ///
    /// Siblings paint in ascending `z_index`, ties in insertion order. Alpha
    /// multiplies down the tree; masks become clip rects around a node's
    /// children. The list is not cleared first.
    pub fn compose(&self, list: &mut DrawList) {
        self.compose_node(self.root(), Transform::IDENTITY, 1.0, list);
    }

    fn compose_node(&self, id: NodeId, parent: Transform, parent_alpha: f32, list: &mut DrawList) {
        let Some(node) = self.nodes.get(id) else { return };
        if !node.visible {
            return;
        }
        let alpha = parent_alpha * node.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }

        let t = parent.child(node);
        let z = ZIndex::default();

        if let Some(local) = node.content_bounds() {
            let rect = t.apply_rect(local);
            match &node.kind {
                NodeKind::Container => {}
                NodeKind::Rect { corner_radius, color, border, .. } => {
                    let border = border.map(|b| Border::new(b.width * t.scale.x, b.color.fade(alpha)));
                    list.push_rect(
                        z,
                        rect,
                        corner_radius * t.scale.x,
                        color.tinted(node.tint).fade(alpha),
                        border,
                    );
                }
                NodeKind::Circle { radius, color } => {
                    list.push_circle(z, t.apply(Vec2::zero()), radius * t.scale.x, color.tinted(node.tint).fade(alpha));
                }
                NodeKind::Text { content, style } => {
                    list.push_text(
                        z,
                        TextCmd {
                            text: content.clone(),
                            size: style.size * t.scale.y,
                            color: style.color.tinted(node.tint).fade(alpha),
                            bold: style.bold,
                            origin: rect.origin,
                            max_width: style.wrap_width.map(|w| w * t.scale.x),
                            stroke: style.stroke.map(|b| Border::new(b.width * t.scale.x, b.color.fade(alpha))),
                        },
                    );
                }
                NodeKind::Image { source, .. } => {
                    list.push_image(z, source.as_str(), rect, node.tint.fade(alpha));
                }
            }
        }

        if node.children.is_empty() {
            return;
        }

        let mask = node.mask.map(|m| t.apply_rect(m));
        if let Some(m) = mask {
            list.push_clip(m);
        }
        for child in self.paint_order(id) {
            self.compose_node(child, t, alpha, list);
        }
        if mask.is_some() {
            list.pop_clip();
        }
    }

    /// Children of `id` sorted back-to-front.
    fn paint_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.children(id).to_vec();
        // Stable: equal z keeps insertion order.
        children.sort_by_key(|c| self.nodes.get(*c).map(|n| n.z_index).unwrap_or(0));
        children
    }

    /// Topmost visible interactive node under `point` (stage space).
    ///
    /// Non-interactive nodes never block nodes below them. A point outside an
    /// ancestor's mask hits nothing in that subtree.
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        self.hit_node(self.root(), Transform::IDENTITY, point)
    }

    fn hit_node(&self, id: NodeId, parent: Transform, point: Vec2) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if !node.visible {
            return None;
        }
        let t = parent.child(node);
        if t.scale.x == 0.0 || t.scale.y == 0.0 {
            return None;
        }
        let local = Vec2::new((point.x - t.offset.x) / t.scale.x, (point.y - t.offset.y) / t.scale.y);

        let children_reachable = node.mask.is_none_or(|m| m.contains(local));
        if children_reachable {
            for child in self.paint_order(id).into_iter().rev() {
                if let Some(hit) = self.hit_node(child, t, point) {
                    return Some(hit);
                }
            }
        }

        if node.interactive {
            let area = node.hit_area.or_else(|| self.local_bounds(id));
            if area.is_some_and(|a: Rect| a.contains(local)) {
                return Some(id);
            }
        }
        None
    }

    /// `id` followed by each of its ancestors up to the top of its tree.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(current) else { break };
            path.push(current);
            cursor = node.parent;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCmd;
    use crate::paint::Color;
    use crate::stage::Node;

    fn square(size: f32) -> Node {
        Node::rect(Vec2::splat(size), Color::WHITE)
    }

    fn rects(list: &mut DrawList) -> Vec<Rect> {
        list.iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Rect(r) => Some(r.rect),
                _ => None,
            })
            .collect()
    }

    // ── compose ───────────────────────────────────────────────────────────

    #[test]
    fn compose_skips_detached_and_hidden_nodes() {
        let mut stage = Stage::new();
        let root = stage.root();
        stage.insert(root, square(1.0));
        stage.insert(root, square(2.0).hidden());
        let loose = stage.spawn(square(3.0));
        assert!(stage.contains(loose));

        let mut list = DrawList::new();
        stage.compose(&mut list);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn compose_orders_siblings_by_z_then_insertion() {
        let mut stage = Stage::new();
        let root = stage.root();
        stage.insert(root, square(1.0).with_z(5));
        stage.insert(root, square(2.0));
        stage.insert(root, square(3.0));

        let mut list = DrawList::new();
        stage.compose(&mut list);
        let sizes: Vec<f32> = rects(&mut list).iter().map(|r| r.size.x).collect();
        assert_eq!(sizes, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn compose_multiplies_alpha_down_the_tree() {
        let mut stage = Stage::new();
        let root = stage.root();
        let group = stage.insert(root, Node::container().with_alpha(0.5));
        stage.insert(group, square(1.0).with_alpha(0.5));

        let mut list = DrawList::new();
        stage.compose(&mut list);
        match &list.items()[0].cmd {
            DrawCmd::Rect(r) => assert!((r.color.a - 0.25).abs() < 1e-6),
            other => panic!("unexpected cmd {other:?}"),
        }
    }

    #[test]
    fn compose_skips_fully_transparent_subtrees() {
        let mut stage = Stage::new();
        let root = stage.root();
        let group = stage.insert(root, Node::container().with_alpha(0.0));
        stage.insert(group, square(1.0));

        let mut list = DrawList::new();
        stage.compose(&mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn mask_clips_children_in_world_space() {
        let mut stage = Stage::new();
        let root = stage.root();
        let panel = stage.insert(
            root,
            Node::container().at(100.0, 100.0).with_mask(Rect::new(0.0, 0.0, 50.0, 50.0)),
        );
        stage.insert(panel, square(80.0));

        let mut list = DrawList::new();
        stage.compose(&mut list);
        assert_eq!(list.items()[0].clip_rect, Some(Rect::new(100.0, 100.0, 50.0, 50.0)));
    }

    #[test]
    fn text_is_scaled_with_its_node() {
        let mut stage = Stage::new();
        let root = stage.root();
        let style = crate::stage::TextStyle::new(10.0, Color::WHITE);
        stage.insert(root, Node::text("7", style).at(10.0, 10.0).with_scale(2.0));

        let mut list = DrawList::new();
        stage.compose(&mut list);
        match &list.items()[0].cmd {
            DrawCmd::Text(t) => {
                assert_eq!(t.size, 20.0);
                assert_eq!(t.origin, Vec2::new(10.0, 10.0));
            }
            other => panic!("unexpected cmd {other:?}"),
        }
    }

    // ── hit testing ───────────────────────────────────────────────────────

    #[test]
    fn hit_test_returns_topmost_interactive() {
        let mut stage = Stage::new();
        let root = stage.root();
        let below = stage.insert(root, square(100.0).interactive());
        let above = stage.insert(root, square(50.0).interactive());

        assert_eq!(stage.hit_test(Vec2::new(10.0, 10.0)), Some(above));
        assert_eq!(stage.hit_test(Vec2::new(80.0, 80.0)), Some(below));
        assert_eq!(stage.hit_test(Vec2::new(150.0, 10.0)), None);
    }

    #[test]
    fn non_interactive_nodes_do_not_block() {
        let mut stage = Stage::new();
        let root = stage.root();
        let button = stage.insert(root, square(100.0).interactive());
        stage.insert(root, square(100.0));

        assert_eq!(stage.hit_test(Vec2::new(10.0, 10.0)), Some(button));
    }

    #[test]
    fn hit_test_prefers_child_over_interactive_parent() {
        let mut stage = Stage::new();
        let root = stage.root();
        let card = stage.insert(root, square(100.0).interactive());
        let badge = stage.insert(card, square(10.0).interactive());

        assert_eq!(stage.hit_test(Vec2::new(5.0, 5.0)), Some(badge));
        assert_eq!(stage.hit_test(Vec2::new(50.0, 50.0)), Some(card));
    }

    #[test]
    fn hit_area_overrides_bounds() {
        let mut stage = Stage::new();
        let root = stage.root();
        let backdrop = stage.insert(
            root,
            Node::container().with_hit_area(Rect::new(0.0, 0.0, 800.0, 600.0)).interactive(),
        );
        assert_eq!(stage.hit_test(Vec2::new(700.0, 500.0)), Some(backdrop));
    }

    #[test]
    fn masked_children_are_not_hit_outside_mask() {
        let mut stage = Stage::new();
        let root = stage.root();
        let panel = stage.insert(root, Node::container().with_mask(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let row = stage.insert(panel, square(100.0).interactive());

        assert_eq!(stage.hit_test(Vec2::new(10.0, 10.0)), Some(row));
        assert_eq!(stage.hit_test(Vec2::new(80.0, 80.0)), None);
    }

    #[test]
    fn hidden_and_zero_scale_nodes_are_not_hit() {
        let mut stage = Stage::new();
        let root = stage.root();
        stage.insert(root, square(100.0).interactive().hidden());
        stage.insert(root, square(100.0).interactive().with_scale(0.0));
        assert_eq!(stage.hit_test(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn path_to_root_walks_ancestors() {
        let mut stage = Stage::new();
        let root = stage.root();
        let a = stage.insert(root, Node::container());
        let b = stage.insert(a, square(1.0));
        assert_eq!(stage.path_to_root(b), vec![b, a, root]);
    }
}
