use std::fmt;

use crate::balance::Balance;
use crate::tree::Tree;

/// Canonical string form of a tree's shape, for diagnostics and tests.
///
/// Nodes are listed in level order and joined by `/`, each one as
/// `key[:value]:parent[L|R][:annotation]`:
///
/// - `parent` is the parent's key, or `ROOT`.
/// - `:value` is printed only after [`with_values`](Self::with_values).
/// - The side letter is printed only after [`with_sides`](Self::with_sides),
///   and only for nodes without a sibling, where key order alone doesn't
///   tell which slot they occupy.
/// - Red-black trees annotate every node with `BK` or `RD`.
///
/// ```
/// let mut tree = bst::BinarySearchTree::new("");
/// for key in [5, 3, 1, 4] {
///     tree.add_or_update_node(key, "x");
/// }
/// assert_eq!(tree.structure().to_string(), "5:ROOT/3:5/1:3/4:3");
/// assert_eq!(tree.structure().with_sides().to_string(), "5:ROOT/3:5L/1:3/4:3");
/// ```
pub struct Structure<'a, K, V, B> {
    tree: &'a Tree<K, V, B>,
    values: bool,
    sides: bool,
}

impl<'a, K, V, B> Structure<'a, K, V, B> {
    pub(crate) fn new(tree: &'a Tree<K, V, B>) -> Self {
        Structure {
            tree,
            values: false,
            sides: false,
        }
    }

    pub fn with_values(mut self) -> Self {
        self.values = true;
        self
    }

    pub fn with_sides(mut self) -> Self {
        self.sides = true;
        self
    }
}

impl<'a, K: fmt::Display, V: fmt::Display, B: Balance> fmt::Display for Structure<'a, K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, node) in self.tree.level_order_nodes().iter().enumerate() {
            if idx != 0 {
                f.write_str("/")?;
            }

            write!(f, "{}", &*node.key())?;
            if self.values {
                write!(f, ":{}", &*node.value())?;
            }

            match node.parent() {
                None => f.write_str(":ROOT")?,
                Some(parent) => {
                    write!(f, ":{}", &*parent.key())?;
                    if self.sides && node.sibling().is_none() {
                        f.write_str(if node.is_left_child() { "L" } else { "R" })?;
                    }
                }
            }

            if let Some(annotation) = B::annotation(node.augment()) {
                write!(f, ":{}", annotation)?;
            }
        }
        Ok(())
    }
}
