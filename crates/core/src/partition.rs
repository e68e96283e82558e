//! Binary space partitioning of a floor rectangle into room-sized leaves.
//!
//! The tree is stored as a flat arena: children are [`NodeId`] indices into
//! the node vector and the root always sits at [`PartitionTree::ROOT`].

use serde::Serialize;

use crate::geometry::{Rect, SplitAxis};
use crate::model::RoomId;
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Leaf { room: Option<RoomId> },
    Split { axis: SplitAxis, line: i32, children: [NodeId; 2] },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PartitionNode {
    pub rect: Rect,
    pub kind: NodeKind,
}

impl PartitionNode {
    fn leaf(rect: Rect) -> Self {
        Self { rect, kind: NodeKind::Leaf { room: None } }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn children(&self) -> Option<[NodeId; 2]> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Split { children, .. } => Some(children),
        }
    }

    pub fn room(&self) -> Option<RoomId> {
        match self.kind {
            NodeKind::Leaf { room } => room,
            NodeKind::Split { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    pub const ROOT: NodeId = NodeId(0);

    /// A tree holding `rect` as its only leaf.
    pub fn single(rect: Rect) -> Self {
        Self { nodes: vec![PartitionNode::leaf(rect)] }
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[Self::ROOT.0]
    }

    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in depth-first order, low child before high child.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut pending = vec![Self::ROOT];
        while let Some(id) = pending.pop() {
            order.push(id);
            if let Some([low, high]) = self.node(id).children() {
                pending.push(high);
                pending.push(low);
            }
        }
        order
    }

    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder().into_iter().filter(|&id| self.node(id).is_leaf()).collect()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(Self::ROOT, 1_usize)];
        while let Some((id, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            if let Some(children) = self.node(id).children() {
                pending.extend(children.map(|child| (child, depth + 1)));
            }
        }
        deepest
    }

    pub(crate) fn assign_room(&mut self, id: NodeId, room: RoomId) {
        if let NodeKind::Leaf { room: slot } = &mut self.nodes[id.0].kind {
            *slot = Some(room);
        }
    }
}

/// Recursively splits `rect` until no node can yield two children that are
/// both at least `min_size` on the cut axis.
///
/// A rectangle too small to split at all comes back as a single leaf.
/// `min_size` below 1 is treated as 1 so every cut makes progress.
pub fn partition(rect: Rect, min_size: i32, rng: &mut impl RandomSource) -> PartitionTree {
    let min_size = min_size.max(1);
    let split_floor = min_size.saturating_mul(2);
    let mut tree = PartitionTree::single(rect);
    let mut pending = vec![PartitionTree::ROOT];

    while let Some(id) = pending.pop() {
        let bounds = tree.node(id).rect;
        if bounds.width < split_floor && bounds.height < split_floor {
            continue;
        }

        let axis = choose_axis(bounds, rng);
        let span = bounds.span(axis);
        // `span == 2 * min_size` leaves an empty draw range, which yields `min_size`.
        let offset = rng.range_i32(min_size, span - min_size);
        let (low, high) = bounds.split(axis, offset);
        let line = match axis {
            SplitAxis::Horizontal => bounds.y + offset,
            SplitAxis::Vertical => bounds.x + offset,
        };
        log::trace!("split {bounds:?} {axis:?} at {line}");

        let low_id = NodeId(tree.nodes.len());
        let high_id = NodeId(low_id.0 + 1);
        tree.nodes.push(PartitionNode::leaf(low));
        tree.nodes.push(PartitionNode::leaf(high));
        tree.nodes[id.0].kind = NodeKind::Split { axis, line, children: [low_id, high_id] };

        pending.push(high_id);
        pending.push(low_id);
    }

    tree
}

/// Cuts across the longer side; squares pick an axis at random.
fn choose_axis(bounds: Rect, rng: &mut impl RandomSource) -> SplitAxis {
    if bounds.width > bounds.height {
        SplitAxis::Vertical
    } else if bounds.height > bounds.width {
        SplitAxis::Horizontal
    } else if rng.coin() {
        SplitAxis::Horizontal
    } else {
        SplitAxis::Vertical
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::rng::SeededRandom;
    use crate::rng::testing::ScriptedRandom;

    fn leaf_rects(tree: &PartitionTree) -> Vec<Rect> {
        tree.leaves().into_iter().map(|id| tree.node(id).rect).collect()
    }

    #[test]
    fn too_small_root_stays_a_single_leaf() {
        let tree = partition(Rect::new(0, 0, 5, 5), 5, &mut SeededRandom::new(1));
        assert_eq!(tree.len(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn huge_min_size_stays_a_single_leaf() {
        let root = Rect::new(0, 0, 5, 5);
        let tree = partition(root, i32::MAX, &mut SeededRandom::new(1));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().rect, root);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn exact_double_span_splits_into_two_minimum_halves() {
        let tree = partition(Rect::new(0, 0, 10, 4), 5, &mut ScriptedRandom::zeros());
        assert_eq!(leaf_rects(&tree), vec![Rect::new(0, 0, 5, 4), Rect::new(5, 0, 5, 4)]);
        assert_eq!(
            tree.root().kind,
            NodeKind::Split {
                axis: SplitAxis::Vertical,
                line: 5,
                children: [NodeId(1), NodeId(2)]
            }
        );
    }

    #[test]
    fn wider_than_tall_cuts_vertically() {
        let tree = partition(Rect::new(0, 0, 12, 4), 4, &mut ScriptedRandom::zeros());
        let NodeKind::Split { axis, .. } = tree.root().kind else {
            panic!("root should split");
        };
        assert_eq!(axis, SplitAxis::Vertical);
    }

    #[test]
    fn taller_than_wide_cuts_horizontally() {
        let tree = partition(Rect::new(0, 0, 4, 12), 4, &mut ScriptedRandom::zeros());
        let NodeKind::Split { axis, .. } = tree.root().kind else {
            panic!("root should split");
        };
        assert_eq!(axis, SplitAxis::Horizontal);
    }

    #[test]
    fn zero_min_size_still_terminates() {
        let tree = partition(Rect::new(0, 0, 3, 3), 0, &mut SeededRandom::new(5));
        assert!(leaf_rects(&tree).iter().all(|rect| rect.width >= 1 && rect.height >= 1));
    }

    #[test]
    fn preorder_visits_every_node_once() {
        let tree = partition(Rect::new(0, 0, 40, 30), 4, &mut SeededRandom::new(77));
        let mut order = tree.preorder();
        assert_eq!(order.first(), Some(&PartitionTree::ROOT));
        order.sort();
        order.dedup();
        assert_eq!(order.len(), tree.len());
    }

    proptest! {
        #[test]
        fn leaves_tile_the_root_and_respect_min_size(
            seed in any::<u64>(),
            width in 1_i32..=48,
            height in 1_i32..=48,
            min_size in 1_i32..=8,
        ) {
            let root = Rect::new(0, 0, width, height);
            let tree = partition(root, min_size, &mut SeededRandom::new(seed));
            let leaves = leaf_rects(&tree);

            let area: i32 = leaves.iter().map(|rect| rect.area()).sum();
            prop_assert_eq!(area, root.area());
            for (index, rect) in leaves.iter().enumerate() {
                prop_assert!(root.contains_rect(*rect));
                if width >= min_size && height >= min_size {
                    prop_assert!(rect.width >= min_size && rect.height >= min_size);
                }
                for other in &leaves[index + 1..] {
                    prop_assert!(!rect.intersects(*other));
                }
                prop_assert!(rect.width < min_size * 2 && rect.height < min_size * 2);
            }
        }
    }
}
