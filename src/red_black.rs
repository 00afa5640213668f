use log::debug;

use crate::balance::{sealed, Balance, Subtree};
use crate::error::Violation;
use crate::node::{self, Augment, Color, NodeRef, Side};
use crate::shared;
use crate::tree::{Tree, Unlinked};

/// Color-balanced strategy.
///
/// Every node is red or black, the root is black, no red node has a red
/// child, and every path from a node down to an empty slot passes the
/// same number of black nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RedBlack;

impl sealed::Sealed for RedBlack {}

impl Balance for RedBlack {
    fn augment() -> Augment {
        Augment::Color(Color::Red)
    }

    fn after_insert<K, V>(tree: &mut Tree<K, V, Self>, node: &NodeRef<K, V>) {
        let mut current = node.clone();

        loop {
            let parent = match current.parent() {
                Some(parent) if parent.is_red() => parent,
                _ => break,
            };
            let grandparent = match current.grandparent() {
                Some(grandparent) => grandparent,
                None => shared::unreachable!("red node can't be the root"),
            };

            let uncle = current.uncle();
            if node::is_red(uncle.as_ref()) {
                debug!("recoloring below a red uncle");
                parent.set_color(Color::Black);
                if let Some(uncle) = uncle {
                    uncle.set_color(Color::Black);
                }
                grandparent.set_color(Color::Red);
                current = grandparent;
                continue;
            }

            let shape = (parent.side(), current.side());
            debug!("rotating {:?} shape below a black uncle", shape);
            match shape {
                (Some(Side::Left), Some(Side::Left)) => {
                    tree.rotate_right(&grandparent);
                    parent.set_color(Color::Black);
                }
                (Some(Side::Left), Some(Side::Right)) => {
                    tree.rotate_left(&parent);
                    tree.rotate_right(&grandparent);
                    current.set_color(Color::Black);
                }
                (Some(Side::Right), Some(Side::Right)) => {
                    tree.rotate_left(&grandparent);
                    parent.set_color(Color::Black);
                }
                (Some(Side::Right), Some(Side::Left)) => {
                    tree.rotate_right(&parent);
                    tree.rotate_left(&grandparent);
                    current.set_color(Color::Black);
                }
                _ => shared::unreachable!("red parent without a grandparent"),
            }
            grandparent.set_color(Color::Red);
            break;
        }

        if let Some(root) = tree.root_node() {
            root.set_color(Color::Black);
        }
    }

    fn after_remove<K, V>(tree: &mut Tree<K, V, Self>, unlinked: &Unlinked<K, V>) {
        if unlinked.removed.is_red() {
            return;
        }

        if let Some(child) = &unlinked.child {
            shared::assume!(child.is_red(), "black node's only child must be red");
            child.set_color(Color::Black);
            return;
        }

        let (parent, side) = match (&unlinked.parent, unlinked.side) {
            (Some(parent), Some(side)) => (parent.clone(), side),
            // The root itself was the last node.
            _ => return,
        };
        fix_double_black(tree, parent, side);
    }

    fn check_node<K, V>(
        node: &NodeRef<K, V>,
        left: Subtree,
        right: Subtree,
    ) -> Result<Subtree, Violation> {
        if left.black_height != right.black_height {
            return Err(Violation::BlackHeight {
                left: left.black_height,
                right: right.black_height,
            });
        }
        if node.is_red() && (node::is_red(node.left().as_ref()) || node::is_red(node.right().as_ref())) {
            return Err(Violation::RedChild);
        }
        Ok(Subtree::join(left, right, !node.is_red()))
    }

    fn check_root<K, V>(root: &NodeRef<K, V>) -> Result<(), Violation> {
        if root.is_red() {
            return Err(Violation::RedRoot);
        }
        Ok(())
    }

    fn annotation(augment: Augment) -> Option<&'static str> {
        match augment {
            Augment::Color(Color::Black) => Some("BK"),
            Augment::Color(Color::Red) => Some("RD"),
            _ => None,
        }
    }
}

/// Pays off the missing black of the (possibly empty) slot `side` of `parent`.
fn fix_double_black<K, V>(tree: &mut Tree<K, V, RedBlack>, mut parent: NodeRef<K, V>, mut side: Side) {
    loop {
        let sibling = match parent.child(side.opposite()) {
            Some(sibling) => sibling,
            None => shared::unreachable!("double black slot without a sibling"),
        };

        if sibling.is_red() {
            shared::assume!(
                !node::is_red(sibling.left().as_ref()) && !node::is_red(sibling.right().as_ref()),
                "red sibling must have black children"
            );
            debug!("rotating a red sibling up");
            sibling.set_color(Color::Black);
            parent.set_color(Color::Red);
            tree.rotate(&parent, side);
            // The sibling's inner child is the new sibling.
            continue;
        }

        let near = sibling.child(side);
        let far = sibling.child(side.opposite());

        if let Some(far) = far.filter(|far| far.is_red()) {
            debug!("rotating a black sibling with a red far child");
            sibling.set_color(parent.color());
            parent.set_color(Color::Black);
            far.set_color(Color::Black);
            tree.rotate(&parent, side);
            return;
        }

        if let Some(near) = near.filter(|near| near.is_red()) {
            debug!("rotating a black sibling with a red near child");
            near.set_color(parent.color());
            parent.set_color(Color::Black);
            tree.rotate(&sibling, side.opposite());
            tree.rotate(&parent, side);
            return;
        }

        debug!("recoloring a black sibling with black children");
        sibling.set_color(Color::Red);
        if parent.is_red() {
            parent.set_color(Color::Black);
            return;
        }

        match (parent.parent(), parent.side()) {
            (Some(grandparent), Some(parent_side)) => {
                parent = grandparent;
                side = parent_side;
            }
            // Reached the root: the extra black is simply dropped.
            _ => return,
        }
    }
}
