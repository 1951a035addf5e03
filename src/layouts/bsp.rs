use log::{debug, trace};
use slotmap::SlotMap;
use thiserror::Error;

use super::walk;
use super::{Rect, Split};
use crate::server::WindowServer;
use crate::tdatile::WindowId;

slotmap::new_key_type! {
    pub struct NodeId;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("node {0:?} is not in the tree")]
    NodeNotFound(NodeId),
    #[error("node {0:?} is not a leaf")]
    NotALeaf(NodeId),
    #[error("node {0:?} is not split")]
    NotInternal(NodeId),
    #[error("split ratio {0} is outside (0, 1)")]
    InvalidRatio(f64),
    #[error("parent of node {0:?} has not been laid out")]
    ParentNotLaidOut(NodeId),
}

/// Checks that a ratio leaves both children with a share of the region.
pub fn validate_ratio(ratio: f64) -> Result<f64, TreeError> {
    // NaN fails both comparisons
    if ratio > 0.0 && ratio < 1.0 {
        Ok(ratio)
    } else {
        Err(TreeError::InvalidRatio(ratio))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A region holding one window. Only an empty root has no window.
    Leaf { window: Option<WindowId> },
    /// A region divided in two. `ratio` is the first child's share.
    Internal {
        first: NodeId,
        second: NodeId,
        ratio: f64,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    // resolved once, on the first layout
    split: Option<Split>,
    rect: Rect,
    // rect last applied to the window
    placed: Option<Rect>,
}

impl Node {
    fn leaf(window: Option<WindowId>, parent: Option<NodeId>, rect: Rect) -> Self {
        Node {
            kind: NodeKind::Leaf { window },
            parent,
            split: None,
            rect,
            placed: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
    pub fn window(&self) -> Option<WindowId> {
        match self.kind {
            NodeKind::Leaf { window } => window,
            NodeKind::Internal { .. } => None,
        }
    }
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { first, second, .. } => Some((first, second)),
        }
    }
    pub fn ratio(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { ratio, .. } => Some(ratio),
        }
    }
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    pub fn split(&self) -> Option<Split> {
        self.split
    }
    pub fn rect(&self) -> Rect {
        self.rect
    }
    pub fn placed(&self) -> Option<Rect> {
        self.placed
    }
}

/// Binary space partition of one screen area.
///
/// Nodes live in an arena: internal nodes own their children through ids,
/// and the parent link is a plain id, so dropping the tree or removing a
/// branch never has a cycle to break.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl LayoutTree {
    /// A tree with a single empty region covering `rect`.
    pub fn new(rect: Rect) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::leaf(None, None, rect));
        LayoutTree { nodes, root }
    }

    pub fn with_window(rect: Rect, window: WindowId) -> Self {
        let mut tree = LayoutTree::new(rect);
        tree.nodes[tree.root].kind = NodeKind::Leaf {
            window: Some(window),
        };
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn get(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Number of nodes, leaves and internal ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no window at all.
    pub fn is_empty(&self) -> bool {
        self.nodes[self.root].kind == NodeKind::Leaf { window: None }
    }

    /// Sets the root region, typically from the screen bounds.
    pub fn set_root_rect(&mut self, rect: Rect) {
        self.nodes[self.root].rect = rect;
    }

    pub fn is_leaf(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.get(id)?.is_leaf())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.get(id)?.parent)
    }

    pub fn is_first_child(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.slots_of_parent(id)?.is_some_and(|(first, _)| first == id))
    }

    pub fn is_second_child(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self
            .slots_of_parent(id)?
            .is_some_and(|(_, second)| second == id))
    }

    fn slots_of_parent(&self, id: NodeId) -> Result<Option<(NodeId, NodeId)>, TreeError> {
        match self.get(id)?.parent {
            Some(parent) => Ok(self.get(parent)?.children()),
            None => Ok(None),
        }
    }

    /// The other child of this node's parent.
    pub fn sibling(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self
            .slots_of_parent(id)?
            .map(|(first, second)| if first == id { second } else { first }))
    }

    pub fn find_window(&self, window: WindowId) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.window() == Some(window))
            .map(|(id, _)| id)
    }

    /// Leaves in pre-order, so left/top regions come first.
    pub fn leaves(&self) -> Vec<NodeId> {
        walk::pre_order(self)
            .into_iter()
            .filter(|id| self.nodes[*id].is_leaf())
            .collect()
    }

    pub fn windows(&self) -> Vec<WindowId> {
        self.leaves()
            .into_iter()
            .filter_map(|id| self.nodes[id].window())
            .collect()
    }

    pub fn last_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let Some((_, second)) = self.nodes[id].children() {
            id = second;
        }
        id
    }

    /// Recomputes one node's split and rect, moving its window if the rect
    /// changed since it was last placed.
    ///
    /// Only this node is touched. Parents must be laid out before their
    /// children, see [`walk::layout_tree`].
    pub fn layout(&mut self, id: NodeId, server: &mut impl WindowServer) -> Result<(), TreeError> {
        let node = self.get(id)?;
        let (split, rect) = match node.parent {
            None => (node.split.unwrap_or(Split::Horizontal), node.rect),
            Some(parent_id) => {
                let parent = self.get(parent_id)?;
                let parent_split = parent.split.ok_or(TreeError::ParentNotLaidOut(id))?;
                let (first, ratio) = match parent.kind {
                    NodeKind::Internal { first, ratio, .. } => (first, ratio),
                    NodeKind::Leaf { .. } => return Err(TreeError::NotInternal(parent_id)),
                };
                let rect = child_rect(parent.rect, parent_split, ratio, first == id);
                (node.split.unwrap_or(parent_split.swap()), rect)
            }
        };

        let node = self.get_mut(id)?;
        node.split = Some(split);
        node.rect = rect;
        trace!("node {:?}: {:?} {}", id, split, rect);
        if let NodeKind::Leaf {
            window: Some(window),
        } = node.kind
        {
            if node.placed != Some(rect) {
                debug!("moving window {} to {}", window, rect);
                server.move_window(window, rect);
                node.placed = Some(rect);
            }
        }
        Ok(())
    }

    /// Gives `window` a region next to the one held by `leaf`.
    ///
    /// The leaf's window moves to a new first child, `window` gets a new
    /// second child and `leaf` becomes their parent. An empty leaf simply
    /// takes the window. Returns the node now holding `window`.
    pub fn split_leaf(
        &mut self,
        leaf: NodeId,
        window: WindowId,
        ratio: f64,
    ) -> Result<NodeId, TreeError> {
        let ratio = validate_ratio(ratio)?;
        let node = self.get(leaf)?;
        let old_window = match node.kind {
            NodeKind::Leaf { window } => window,
            NodeKind::Internal { .. } => return Err(TreeError::NotALeaf(leaf)),
        };
        let Some(old_window) = old_window else {
            self.nodes[leaf].kind = NodeKind::Leaf {
                window: Some(window),
            };
            return Ok(leaf);
        };

        let rect = node.rect;
        let placed = node.placed;
        let mut first_node = Node::leaf(Some(old_window), Some(leaf), rect);
        first_node.placed = placed;
        let first = self.nodes.insert(first_node);
        let second = self.nodes.insert(Node::leaf(Some(window), Some(leaf), rect));

        let node = &mut self.nodes[leaf];
        node.kind = NodeKind::Internal {
            first,
            second,
            ratio,
        };
        node.placed = None;
        debug!("split {:?}: {} | {}", leaf, old_window, window);
        Ok(second)
    }

    /// Removes a leaf, promoting its sibling into the parent's place.
    ///
    /// The root is never removed: removing the last window leaves an empty
    /// root. Returns the window the leaf held.
    pub fn remove_leaf(&mut self, leaf: NodeId) -> Result<Option<WindowId>, TreeError> {
        let node = self.get(leaf)?;
        let window = match node.kind {
            NodeKind::Leaf { window } => window,
            NodeKind::Internal { .. } => return Err(TreeError::NotALeaf(leaf)),
        };
        let Some(parent) = node.parent else {
            let root = &mut self.nodes[leaf];
            root.kind = NodeKind::Leaf { window: None };
            root.placed = None;
            return Ok(window);
        };
        let sibling = self
            .sibling(leaf)?
            .ok_or(TreeError::NotInternal(parent))?;
        let parent_node = self.get(parent)?;
        let grandparent = parent_node.parent;
        let parent_rect = parent_node.rect;

        self.nodes.remove(leaf);
        self.nodes.remove(parent);
        self.nodes[sibling].parent = grandparent;
        match grandparent {
            None => {
                self.root = sibling;
                self.nodes[sibling].rect = parent_rect;
            }
            Some(grandparent) => {
                if let NodeKind::Internal { first, second, .. } = &mut self.nodes[grandparent].kind
                {
                    if *first == parent {
                        *first = sibling;
                    } else if *second == parent {
                        *second = sibling;
                    }
                }
            }
        }
        debug!("removed {:?}, promoted {:?}", leaf, sibling);
        Ok(window)
    }

    pub fn set_ratio(&mut self, id: NodeId, ratio: f64) -> Result<(), TreeError> {
        let ratio = validate_ratio(ratio)?;
        match &mut self.get_mut(id)?.kind {
            NodeKind::Internal { ratio: current, .. } => {
                *current = ratio;
                Ok(())
            }
            NodeKind::Leaf { .. } => Err(TreeError::NotInternal(id)),
        }
    }

    /// Records where a node's window actually is, so the next layout moves
    /// it back if that is not where it belongs.
    pub fn set_placed(&mut self, id: NodeId, rect: Rect) -> Result<(), TreeError> {
        self.get_mut(id)?.placed = Some(rect);
        Ok(())
    }

    /// Forces the next layout to move this node's window.
    pub fn forget_placement(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.get_mut(id)?.placed = None;
        Ok(())
    }
}

/// Region of one child of a region split along `split`.
///
/// The first child gets `extent * ratio` rounded, the second one the rest,
/// so the two always tile the parent exactly. Neither child is left with
/// zero pixels unless the parent has fewer than two.
fn child_rect(parent: Rect, split: Split, ratio: f64, first: bool) -> Rect {
    match split {
        Split::Horizontal => {
            let head = share(parent.h, ratio);
            if first {
                Rect::new(parent.x, parent.y, parent.w, head)
            } else {
                Rect::new(parent.x, parent.y + head as i32, parent.w, parent.h - head)
            }
        }
        Split::Vertical => {
            let head = share(parent.w, ratio);
            if first {
                Rect::new(parent.x, parent.y, head, parent.h)
            } else {
                Rect::new(parent.x + head as i32, parent.y, parent.w - head, parent.h)
            }
        }
    }
}

fn share(extent: u32, ratio: f64) -> u32 {
    let head = (f64::from(extent) * ratio).round() as u32;
    if extent < 2 {
        return head.min(extent);
    }
    head.clamp(1, extent - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::layout_tree;
    use crate::server::{MockServer, ServerCall};
    use pretty_assertions::assert_eq;

    const SCREEN: Rect = Rect::new(0, 0, 1920, 1080);

    fn rect_of(tree: &LayoutTree, id: NodeId) -> Rect {
        tree.node(id).unwrap().rect()
    }

    fn children(tree: &LayoutTree, id: NodeId) -> (NodeId, NodeId) {
        tree.node(id).unwrap().children().unwrap()
    }

    #[test]
    fn single_window_keeps_screen_and_moves_once() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        for _ in 0..3 {
            layout_tree(&mut tree, &mut server).unwrap();
        }
        assert_eq!(rect_of(&tree, tree.root()), SCREEN);
        assert_eq!(server.moves(), vec![(1, SCREEN)]);
    }

    #[test]
    fn root_split_defaults_to_horizontal() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::new(SCREEN);
        assert_eq!(tree.node(tree.root()).unwrap().split(), None);
        tree.layout(tree.root(), &mut server).unwrap();
        assert_eq!(
            tree.node(tree.root()).unwrap().split(),
            Some(Split::Horizontal)
        );
        assert!(server.calls.is_empty());
    }

    #[test]
    fn half_split_stacks_children() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        tree.split_leaf(tree.root(), 2, 0.5).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();

        let (first, second) = children(&tree, tree.root());
        assert_eq!(rect_of(&tree, first), Rect::new(0, 0, 1920, 540));
        assert_eq!(rect_of(&tree, second), Rect::new(0, 540, 1920, 540));
        assert_eq!(tree.node(first).unwrap().window(), Some(1));
        assert_eq!(tree.node(second).unwrap().window(), Some(2));
    }

    #[test]
    fn uneven_ratio_uses_remainder_for_second_child() {
        let area = Rect::new(0, 0, 1000, 1000);
        let mut server = MockServer::new(area);
        let mut tree = LayoutTree::with_window(area, 1);
        tree.split_leaf(tree.root(), 2, 0.3).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();

        let (first, second) = children(&tree, tree.root());
        assert_eq!(rect_of(&tree, first), Rect::new(0, 0, 1000, 300));
        assert_eq!(rect_of(&tree, second), Rect::new(0, 300, 1000, 700));
    }

    #[test]
    fn second_level_splits_vertically() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        tree.split_leaf(tree.root(), 2, 0.5).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();

        let (first, _) = children(&tree, tree.root());
        tree.split_leaf(first, 3, 0.5).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();

        assert_eq!(tree.node(first).unwrap().split(), Some(Split::Vertical));
        let (a, b) = children(&tree, first);
        assert_eq!(rect_of(&tree, a), Rect::new(0, 0, 960, 540));
        assert_eq!(rect_of(&tree, b), Rect::new(960, 0, 960, 540));
    }

    #[test]
    fn removing_second_child_promotes_first_to_root() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let second = tree.split_leaf(tree.root(), 2, 0.5).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();
        server.clear_calls();

        assert_eq!(tree.remove_leaf(second).unwrap(), Some(2));
        layout_tree(&mut tree, &mut server).unwrap();

        let root = tree.root();
        assert!(tree.is_leaf(root).unwrap());
        assert_eq!(tree.parent(root).unwrap(), None);
        assert_eq!(tree.len(), 1);
        assert_eq!(rect_of(&tree, root), SCREEN);
        assert_eq!(server.calls, vec![ServerCall::Move(1, SCREEN)]);
    }

    #[test]
    fn promoted_subtree_keeps_its_shape() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        let two = tree.split_leaf(root, 2, 0.5).unwrap();
        let three = tree.split_leaf(two, 3, 0.5).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();

        let (first, _) = children(&tree, root);
        tree.remove_leaf(first).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();

        let new_root = tree.root();
        assert_ne!(new_root, root);
        assert_eq!(rect_of(&tree, new_root), SCREEN);
        assert_eq!(tree.windows(), vec![2, 3]);
        // split stays vertical once resolved
        assert_eq!(rect_of(&tree, three), Rect::new(960, 0, 960, 1080));
    }

    #[test]
    fn removing_nested_leaf_rewires_grandparent() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        let two = tree.split_leaf(root, 2, 0.5).unwrap();
        let three = tree.split_leaf(two, 3, 0.5).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();

        tree.remove_leaf(three).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();

        let (_, second) = children(&tree, root);
        assert_eq!(tree.node(second).unwrap().window(), Some(2));
        assert_eq!(tree.parent(second).unwrap(), Some(root));
        assert!(tree.is_second_child(second).unwrap());
        assert_eq!(rect_of(&tree, second), Rect::new(0, 540, 1920, 540));
    }

    #[test]
    fn removing_last_window_empties_root() {
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        assert_eq!(tree.remove_leaf(root).unwrap(), Some(1));
        assert!(tree.is_empty());
        assert_eq!(tree.root(), root);
        assert_eq!(rect_of(&tree, root), SCREEN);
    }

    #[test]
    fn boundary_ratios_are_rejected() {
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        for ratio in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                tree.split_leaf(root, 2, ratio),
                Err(TreeError::InvalidRatio(_))
            ));
        }
        assert!(tree.is_leaf(root).unwrap());

        tree.split_leaf(root, 2, 0.5).unwrap();
        assert_eq!(tree.set_ratio(root, 0.0), Err(TreeError::InvalidRatio(0.0)));
        assert_eq!(tree.set_ratio(root, 1.0), Err(TreeError::InvalidRatio(1.0)));
        assert_eq!(tree.node(root).unwrap().ratio(), Some(0.5));
    }

    #[test]
    fn extreme_ratios_keep_both_children_visible() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        tree.split_leaf(root, 2, 0.0001).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();
        let (first, second) = children(&tree, root);
        assert_eq!(rect_of(&tree, first), Rect::new(0, 0, 1920, 1));
        assert_eq!(rect_of(&tree, second), Rect::new(0, 1, 1920, 1079));

        tree.set_ratio(root, 0.9999).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();
        assert_eq!(rect_of(&tree, first), Rect::new(0, 0, 1920, 1079));
        assert_eq!(rect_of(&tree, second), Rect::new(0, 1079, 1920, 1));
    }

    #[test]
    fn small_regions_split_without_empty_children() {
        for (h, first_h) in [(2, 1), (3, 1), (1, 0)] {
            let area = Rect::new(0, 0, 100, h);
            let mut server = MockServer::new(area);
            let mut tree = LayoutTree::with_window(area, 1);
            let root = tree.root();
            tree.split_leaf(root, 2, 0.1).unwrap();
            layout_tree(&mut tree, &mut server).unwrap();
            let (first, second) = children(&tree, root);
            assert_eq!(rect_of(&tree, first).h, first_h);
            assert_eq!(rect_of(&tree, first).h + rect_of(&tree, second).h, h);
        }
    }

    #[test]
    fn set_ratio_needs_internal_node() {
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        assert_eq!(tree.set_ratio(root, 0.4), Err(TreeError::NotInternal(root)));
        tree.split_leaf(root, 2, 0.5).unwrap();
        assert_eq!(tree.split_leaf(root, 3, 0.5), Err(TreeError::NotALeaf(root)));
        assert_eq!(tree.remove_leaf(root), Err(TreeError::NotALeaf(root)));
    }

    #[test]
    fn children_tile_parent_for_any_ratio() {
        let area = Rect::new(17, 33, 1001, 777);
        for ratio in [0.01, 0.25, 0.333, 0.5, 0.61, 0.99] {
            let mut server = MockServer::new(area);
            let mut tree = LayoutTree::with_window(area, 1);
            let root = tree.root();
            let second = tree.split_leaf(root, 2, ratio).unwrap();
            tree.split_leaf(second, 3, ratio).unwrap();
            layout_tree(&mut tree, &mut server).unwrap();

            for id in walk::pre_order(&tree) {
                let node = tree.node(id).unwrap();
                let Some((a, b)) = node.children() else {
                    continue;
                };
                let (p, a, b) = (node.rect(), rect_of(&tree, a), rect_of(&tree, b));
                match node.split().unwrap() {
                    Split::Horizontal => {
                        assert_eq!((a.x, a.y, a.w), (p.x, p.y, p.w));
                        assert_eq!((b.x, b.w), (p.x, p.w));
                        assert_eq!(b.y, a.y + a.h as i32);
                        assert_eq!(a.h + b.h, p.h);
                    }
                    Split::Vertical => {
                        assert_eq!((a.x, a.y, a.h), (p.x, p.y, p.h));
                        assert_eq!((b.y, b.h), (p.y, p.h));
                        assert_eq!(b.x, a.x + a.w as i32);
                        assert_eq!(a.w + b.w, p.w);
                    }
                }
            }
        }
    }

    #[test]
    fn split_is_stable_across_layouts() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        let second = tree.split_leaf(root, 2, 0.5).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();
        let before: Vec<_> = walk::pre_order(&tree)
            .into_iter()
            .map(|id| tree.node(id).unwrap().split())
            .collect();
        server.clear_calls();

        layout_tree(&mut tree, &mut server).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();
        let after: Vec<_> = walk::pre_order(&tree)
            .into_iter()
            .map(|id| tree.node(id).unwrap().split())
            .collect();
        assert_eq!(before, after);
        assert_eq!(tree.node(second).unwrap().split(), Some(Split::Vertical));
        assert!(server.calls.is_empty());
    }

    #[test]
    fn ratio_change_moves_only_changed_windows() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        tree.split_leaf(root, 2, 0.5).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();
        server.clear_calls();

        tree.set_ratio(root, 0.25).unwrap();
        layout_tree(&mut tree, &mut server).unwrap();
        assert_eq!(
            server.moves(),
            vec![
                (1, Rect::new(0, 0, 1920, 270)),
                (2, Rect::new(0, 270, 1920, 810))
            ]
        );
    }

    #[test]
    fn child_before_parent_is_refused() {
        let mut server = MockServer::new(SCREEN);
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let second = tree.split_leaf(tree.root(), 2, 0.5).unwrap();
        assert_eq!(
            tree.layout(second, &mut server),
            Err(TreeError::ParentNotLaidOut(second))
        );
    }

    #[test]
    fn child_position_is_by_identity() {
        let mut tree = LayoutTree::with_window(SCREEN, 1);
        let root = tree.root();
        let second = tree.split_leaf(root, 1, 0.5).unwrap();
        let (first, _) = children(&tree, root);
        // both leaves hold the same handle, only identity tells them apart
        assert!(tree.is_first_child(first).unwrap());
        assert!(!tree.is_second_child(first).unwrap());
        assert!(tree.is_second_child(second).unwrap());
        assert!(!tree.is_first_child(root).unwrap());
        assert!(!tree.is_second_child(root).unwrap());
        assert_eq!(tree.sibling(first).unwrap(), Some(second));
    }

    #[test]
    fn leaf_iff_no_children() {
        let mut tree = LayoutTree::new(SCREEN);
        let root = tree.root();
        assert!(tree.is_leaf(root).unwrap());
        assert_eq!(tree.split_leaf(root, 1, 0.5).unwrap(), root);
        assert!(tree.is_leaf(root).unwrap());
        let second = tree.split_leaf(root, 2, 0.5).unwrap();
        assert!(!tree.is_leaf(root).unwrap());
        for id in walk::pre_order(&tree) {
            let node = tree.node(id).unwrap();
            assert_eq!(node.is_leaf(), node.children().is_none());
        }
        tree.remove_leaf(second).unwrap();
        assert!(tree.is_leaf(tree.root()).unwrap());
        assert_eq!(
            tree.is_leaf(second),
            Err(TreeError::NodeNotFound(second))
        );
    }
}
