use log::debug;

use crate::balance::{sealed, Balance, Subtree};
use crate::error::Violation;
use crate::node::{self, Augment, NodeRef, Side};
use crate::shared;
use crate::tree::{Tree, Unlinked};

/// Height-balanced strategy: sibling subtree heights never differ by more than one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Avl;

impl sealed::Sealed for Avl {}

impl Balance for Avl {
    fn augment() -> Augment {
        Augment::Height(1)
    }

    fn after_insert<K, V>(tree: &mut Tree<K, V, Self>, node: &NodeRef<K, V>) {
        update_heights_upward(Some(node.clone()));

        let mut child = node.clone();
        let mut parent = match node.parent() {
            Some(parent) => parent,
            None => return,
        };

        // A new leaf can only unbalance its grandparent or something above it.
        while let Some(grandparent) = parent.parent() {
            if !is_balanced(&grandparent) {
                let subtree = rebalance(tree, &grandparent, &parent, &child);
                update_heights_upward(subtree.parent());
                return;
            }
            child = parent;
            parent = grandparent;
        }
    }

    fn after_remove<K, V>(tree: &mut Tree<K, V, Self>, unlinked: &Unlinked<K, V>) {
        let mut current = unlinked.parent.clone();

        // One rotation may leave ancestors unbalanced, so walk all the way up.
        while let Some(node) = current {
            update_height(&node);
            let node = if is_balanced(&node) {
                node
            } else {
                let parent = taller_child(&node, Side::Left);
                let side = parent.side().unwrap_or(Side::Left);
                let child = taller_child(&parent, side);
                rebalance(tree, &node, &parent, &child)
            };
            current = node.parent();
        }
    }

    fn check_node<K, V>(
        node: &NodeRef<K, V>,
        left: Subtree,
        right: Subtree,
    ) -> Result<Subtree, Violation> {
        let measured = Subtree::join(left, right, false);
        if node.height() != measured.height {
            return Err(Violation::Height {
                stored: node.height(),
                computed: measured.height,
            });
        }
        if left.height.abs_diff(right.height) > 1 {
            return Err(Violation::Unbalanced {
                left: left.height,
                right: right.height,
            });
        }
        Ok(measured)
    }
}

fn update_height<K, V>(node: &NodeRef<K, V>) {
    let (left, right) = balance_heights(node);
    node.set_height(1 + left.max(right));
}

fn update_heights_upward<K, V>(mut current: Option<NodeRef<K, V>>) {
    while let Some(node) = current {
        update_height(&node);
        current = node.parent();
    }
}

fn balance_heights<K, V>(node: &NodeRef<K, V>) -> (usize, usize) {
    (
        node::height(node.left().as_ref()),
        node::height(node.right().as_ref()),
    )
}

fn is_balanced<K, V>(node: &NodeRef<K, V>) -> bool {
    let (left, right) = balance_heights(node);
    left.abs_diff(right) <= 1
}

/// The child with the greater height; on a tie the one on `prefer`.
fn taller_child<K, V>(node: &NodeRef<K, V>, prefer: Side) -> NodeRef<K, V> {
    let (left, right) = balance_heights(node);
    let side = if left > right {
        Side::Left
    } else if right > left {
        Side::Right
    } else {
        prefer
    };

    match node.child(side) {
        Some(child) => child,
        None => shared::unreachable!("taller child of an unbalanced node is missing"),
    }
}

/// Restores balance at `grandparent` given the path `grandparent -> parent -> child`
/// and returns the root of the rebuilt subtree.
fn rebalance<K, V>(
    tree: &mut Tree<K, V, Avl>,
    grandparent: &NodeRef<K, V>,
    parent: &NodeRef<K, V>,
    child: &NodeRef<K, V>,
) -> NodeRef<K, V> {
    let shape = (parent.side(), child.side());
    debug!("rebalancing {:?} shape", shape);

    let subtree = match shape {
        (Some(Side::Left), Some(Side::Left)) => {
            tree.rotate_right(grandparent);
            parent.clone()
        }
        (Some(Side::Left), Some(Side::Right)) => {
            tree.rotate_left(parent);
            tree.rotate_right(grandparent);
            child.clone()
        }
        (Some(Side::Right), Some(Side::Left)) => {
            tree.rotate_right(parent);
            tree.rotate_left(grandparent);
            child.clone()
        }
        (Some(Side::Right), Some(Side::Right)) => {
            tree.rotate_left(grandparent);
            parent.clone()
        }
        _ => shared::unreachable!("rebalancing needs a grandchild path"),
    };

    update_height(grandparent);
    update_height(parent);
    if subtree.ptr_eq(child) {
        update_height(child);
    }
    subtree
}
