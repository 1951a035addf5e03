use log::trace;

use super::{LayoutTree, NodeId, TreeError};
use crate::server::WindowServer;

/// Node ids with every parent ahead of its children, first child's branch
/// before the second's.
pub fn pre_order(tree: &LayoutTree) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(tree.len());
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        order.push(id);
        if let Some((first, second)) = tree.node(id).and_then(|node| node.children()) {
            stack.push(second);
            stack.push(first);
        }
    }
    order
}

/// Lays out the whole tree top-down, moving every window whose region
/// changed.
pub fn layout_tree(tree: &mut LayoutTree, server: &mut impl WindowServer) -> Result<(), TreeError> {
    trace!("computing layout..");
    for id in pre_order(tree) {
        tree.layout(id, server)?;
    }
    Ok(())
}
