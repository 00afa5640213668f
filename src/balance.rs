use crate::error::Violation;
use crate::node::{Augment, NodeRef};
use crate::tree::{Tree, Unlinked};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Rebalancing policy a [`Tree`] applies after every structural change.
///
/// Implemented by [`Plain`], [`Avl`](crate::Avl) and [`RedBlack`](crate::RedBlack).
/// The hooks run after the shared BST insert/unlink has finished and walk
/// from the mutation point toward the root.
pub trait Balance: sealed::Sealed + Sized {
    #[doc(hidden)]
    fn augment() -> Augment;

    #[doc(hidden)]
    fn after_insert<K, V>(tree: &mut Tree<K, V, Self>, node: &NodeRef<K, V>);

    #[doc(hidden)]
    fn after_remove<K, V>(tree: &mut Tree<K, V, Self>, unlinked: &Unlinked<K, V>);

    #[doc(hidden)]
    fn check_node<K, V>(
        _node: &NodeRef<K, V>,
        left: Subtree,
        right: Subtree,
    ) -> Result<Subtree, Violation> {
        Ok(Subtree::join(left, right, false))
    }

    #[doc(hidden)]
    fn check_root<K, V>(_root: &NodeRef<K, V>) -> Result<(), Violation> {
        Ok(())
    }

    /// Suffix printed after each node by [`Tree::structure`].
    #[doc(hidden)]
    fn annotation(_augment: Augment) -> Option<&'static str> {
        None
    }
}

/// Measurements of a validated subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subtree {
    pub height: usize,
    pub black_height: usize,
}

impl Subtree {
    pub const EMPTY: Subtree = Subtree {
        height: 0,
        black_height: 0,
    };

    pub fn join(left: Subtree, right: Subtree, black: bool) -> Subtree {
        Subtree {
            height: 1 + left.height.max(right.height),
            black_height: left.black_height.max(right.black_height) + black as usize,
        }
    }
}

/// No rebalancing: an ordinary binary search tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Plain;

impl sealed::Sealed for Plain {}

impl Balance for Plain {
    fn augment() -> Augment {
        Augment::Plain
    }

    fn after_insert<K, V>(_tree: &mut Tree<K, V, Self>, _node: &NodeRef<K, V>) {}

    fn after_remove<K, V>(_tree: &mut Tree<K, V, Self>, _unlinked: &Unlinked<K, V>) {}
}
