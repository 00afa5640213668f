use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use log::{debug, trace};

use crate::balance::{Balance, Plain, Subtree};
use crate::cursor::{Cursor, CursorMut, Iter};
use crate::error::{MergeError, Violation};
use crate::node::{NodeRef, Side};
use crate::shared;
use crate::structure::Structure;

/// An ordered map built on a binary search tree, rebalanced by `B`.
///
/// Every tree carries a designated null value. It is never stored:
/// inserting it is a no-op, and looking up a missing key returns it.
pub struct Tree<K, V, B = Plain> {
    root: Option<NodeRef<K, V>>,
    null_value: V,
    size: usize,
    _balance: PhantomData<B>,
}

/// What the shared unlink step leaves behind for the rebalancing hook.
pub struct Unlinked<K, V> {
    /// The detached node. Its augmentation is still readable.
    pub removed: NodeRef<K, V>,
    pub parent: Option<NodeRef<K, V>>,
    /// Slot of `parent` the removed node used to occupy.
    pub side: Option<Side>,
    /// The node that moved into the vacated slot.
    pub child: Option<NodeRef<K, V>>,
}

// All the `Rc`s are local to each tree and not exposed past a borrow of it,
// so moving the whole tree to another thread is fine.
// It is not `Sync` since cursors clone handles through `&Tree`.
#[cfg(feature = "std-compat")]
unsafe impl<K: Send, V: Send, B> Send for Tree<K, V, B> {}

impl<K, V, B> Tree<K, V, B> {
    #[inline]
    pub fn new(null_value: V) -> Self {
        Tree {
            root: None,
            null_value,
            size: 0,
            _balance: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn null_value(&self) -> &V {
        &self.null_value
    }

    /// Drops every node. Runs in a loop rather than recursively, so a
    /// degenerate tree doesn't exhaust the stack.
    pub fn clear(&mut self) {
        let mut stack: Vec<_> = self.root.take().into_iter().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.take_children());
        }
        self.size = 0;
    }

    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.root.clone().map(NodeRef::leftmost))
    }

    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(None)
    }

    /// Cursor at the greatest key, or the end cursor if the tree is empty.
    pub fn last(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.root.clone().map(NodeRef::rightmost))
    }

    pub fn first_key_value(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.begin().entry()
    }

    pub fn last_key_value(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.last().entry()
    }

    pub fn root(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.root.clone())
    }

    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V, B> {
        let node = self.root.clone().map(NodeRef::leftmost);
        CursorMut::new(self, node)
    }

    pub fn root_mut(&mut self) -> CursorMut<'_, K, V, B> {
        let node = self.root.clone();
        CursorMut::new(self, node)
    }

    /// Iterates the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.begin(), self.size)
    }

    /// Debug serialization of the tree shape, see [`Structure`].
    pub fn structure(&self) -> Structure<'_, K, V, B> {
        Structure::new(self)
    }

    /// Clones out all entries in level order.
    pub fn level_order(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.level_order_nodes()
            .iter()
            .map(|node| (node.key().clone(), node.value().clone()))
            .collect()
    }

    pub(crate) fn level_order_nodes(&self) -> Vec<NodeRef<K, V>> {
        let mut nodes: Vec<_> = self.root.iter().cloned().collect();
        let mut idx = 0;
        while idx < nodes.len() {
            let children = nodes[idx].children();
            nodes.extend(children);
            idx += 1;
        }
        nodes
    }

    /// Empties the tree, handing each entry to `f` in level order.
    pub(crate) fn drain_level_order<F: FnMut(K, V)>(&mut self, mut f: F) {
        let mut queue: Vec<_> = self.root.take().into_iter().collect();
        self.size = 0;
        let mut idx = 0;
        while idx < queue.len() {
            let children = queue[idx].take_children();
            queue.extend(children);
            idx += 1;
        }
        for node in queue {
            let (key, value) = node.into_entry();
            f(key, value);
        }
    }

    /// Rotates `node` down toward `direction`. Its child on the other side
    /// takes its place, also as the tree root if `node` was the root.
    ///
    /// Only links change; the caller fixes up heights and colors.
    pub(crate) fn rotate(&mut self, node: &NodeRef<K, V>, direction: Side) {
        let pivot = match node.child(direction.opposite()) {
            Some(pivot) => pivot,
            None => shared::unreachable!("{:?} rotation without a node to pivot on", direction),
        };
        trace!("rotating {:?}", direction);

        let parent = node.parent();
        let side = node.side();

        let inner = pivot.take_child(direction);
        node.set_child(direction.opposite(), inner);
        pivot.set_child(direction, Some(node.clone()));

        match (parent, side) {
            (Some(parent), Some(side)) => {
                parent.set_child(side, Some(pivot));
            }
            _ => {
                pivot.detach_parent();
                self.root = Some(pivot);
            }
        }
    }

    pub(crate) fn rotate_left(&mut self, node: &NodeRef<K, V>) {
        self.rotate(node, Side::Left)
    }

    pub(crate) fn rotate_right(&mut self, node: &NodeRef<K, V>) {
        self.rotate(node, Side::Right)
    }

    pub(crate) fn root_node(&self) -> Option<&NodeRef<K, V>> {
        self.root.as_ref()
    }

    /// Replaces `node` by its only child (or nothing) in its parent's slot.
    fn unlink(&mut self, node: NodeRef<K, V>) -> Unlinked<K, V> {
        let child = match node.take_child(Side::Left) {
            Some(left) => {
                shared::assume!(node.right().is_none(), "unlinked node has two children");
                Some(left)
            }
            None => node.take_child(Side::Right),
        };
        let parent = node.parent();
        let side = node.side();
        node.detach_parent();

        match (&parent, side) {
            (Some(parent), Some(side)) => {
                parent.set_child(side, child.clone());
            }
            _ => {
                if let Some(child) = &child {
                    child.detach_parent();
                }
                self.root = child.clone();
            }
        }
        self.size -= 1;
        trace!("unlinked node, {} left", self.size);

        Unlinked {
            removed: node,
            parent,
            side,
            child,
        }
    }
}

impl<K, V, B: Balance> Tree<K, V, B> {
    /// Removes `target` and returns its entry. If `target` has two
    /// children it trades entries with its in-order successor, which is
    /// unlinked in its place.
    pub(crate) fn remove_at(&mut self, target: NodeRef<K, V>) -> (K, V) {
        let target = if target.left().is_some() && target.right().is_some() {
            match target.swap_entry_with_in_order_successor() {
                Some(successor) => successor,
                None => shared::unreachable!("node with a right child has a successor"),
            }
        } else {
            target
        };

        let unlinked = self.unlink(target);
        B::after_remove(self, &unlinked);
        let Unlinked { removed, .. } = unlinked;
        removed.into_entry()
    }
}

impl<K: Ord, V: PartialEq, B: Balance> Tree<K, V, B> {
    /// Inserts a new entry or overwrites the value of an existing key.
    ///
    /// Returns `true` only if a new node was created. Storing the null
    /// value is a no-op that returns `false`.
    pub fn add_or_update_node(&mut self, key: K, value: V) -> bool {
        if value == self.null_value {
            return false;
        }

        let mut current = match &self.root {
            Some(root) => root.clone(),
            None => {
                let node = NodeRef::new(key, value, B::augment());
                self.root = Some(node.clone());
                self.size = 1;
                trace!("created root node");
                B::after_insert(self, &node);
                return true;
            }
        };

        let node = loop {
            let ordering = key.cmp(&*current.key());
            let side = match ordering {
                Ordering::Equal => {
                    current.replace_value(value);
                    return false;
                }
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };

            match current.child(side) {
                Some(child) => current = child,
                None => {
                    let node = NodeRef::new(key, value, B::augment());
                    current.set_child(side, Some(node.clone()));
                    break node;
                }
            }
        };

        self.size += 1;
        trace!("created leaf node, {} in tree", self.size);
        B::after_insert(self, &node);
        true
    }

    /// Returns `true` if a node with `key` existed and was removed.
    pub fn remove_node<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.find_node(key)?;
        Some(self.remove_at(target))
    }

    /// Returns a clone of the stored value, or of the null value if `key` is absent.
    pub fn get_node_value<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        match self.find_node(key) {
            Some(node) => node.value().clone(),
            None => self.null_value.clone(),
        }
    }

    /// Like [`get_node_value`](Self::get_node_value), but `None` for a missing key.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.find_node(key).map(|node| node.value().clone())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Cursor at `key`, or the end cursor if it's absent.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.find_node(key))
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, B>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(key);
        CursorMut::new(self, node)
    }

    /// Moves every entry of `other` into this tree in level order,
    /// leaving `other` empty. Entries of `other` win on equal keys.
    pub fn merge_tree<B2: Balance>(&mut self, other: &mut Tree<K, V, B2>) -> Result<(), MergeError> {
        if self.null_value != other.null_value {
            return Err(MergeError::NullValueMismatch);
        }

        debug!("merging {} nodes into a tree of {}", other.size, self.size);
        other.drain_level_order(|key, value| {
            self.add_or_update_node(key, value);
        });
        Ok(())
    }

    /// Copies this tree into another balancing strategy by re-inserting
    /// its entries in level order.
    pub fn rebuild<B2: Balance>(&self) -> Tree<K, V, B2>
    where
        K: Clone,
        V: Clone,
    {
        let mut tree = Tree::new(self.null_value.clone());
        for node in self.level_order_nodes() {
            tree.add_or_update_node(node.key().clone(), node.value().clone());
        }
        tree
    }

    /// Like [`rebuild`](Self::rebuild), but moves the entries.
    pub fn into_balance<B2: Balance>(mut self) -> Tree<K, V, B2>
    where
        V: Clone,
    {
        let mut tree = Tree::new(self.null_value.clone());
        self.drain_level_order(|key, value| {
            tree.add_or_update_node(key, value);
        });
        tree
    }

    /// Checks every structural invariant: key order, parent links, the
    /// recorded size, absence of the null value, and the invariants of `B`.
    pub fn validate(&self) -> Result<(), Violation> {
        let root = match &self.root {
            Some(root) => root,
            None if self.size == 0 => return Ok(()),
            None => {
                return Err(Violation::Size {
                    recorded: self.size,
                    counted: 0,
                })
            }
        };

        if !root.is_root() {
            return Err(Violation::RootHasParent);
        }
        self.check_subtree(root)?;
        B::check_root(root)?;

        let mut counted = 1;
        let mut previous = root.clone().leftmost();
        while let Some(next) = previous.next_in_order() {
            if *previous.key() >= *next.key() {
                return Err(Violation::Order);
            }
            counted += 1;
            previous = next;
        }

        if counted != self.size {
            return Err(Violation::Size {
                recorded: self.size,
                counted,
            });
        }
        Ok(())
    }

    /// Post-order walk with an explicit stack, so list-shaped trees of any
    /// depth can be checked. Each frame holds a node, how many of its sides
    /// were visited, and the measurements of its finished subtrees.
    fn check_subtree(&self, root: &NodeRef<K, V>) -> Result<Subtree, Violation> {
        self.check_value(root)?;
        let mut stack = vec![(root.clone(), 0, [Subtree::EMPTY; 2])];

        while let Some((node, visited, measured)) = stack.last_mut() {
            let side = match *visited {
                0 => Side::Left,
                1 => Side::Right,
                _ => {
                    let subtree = B::check_node(node, measured[0], measured[1])?;
                    stack.pop();
                    match stack.last_mut() {
                        Some((_, visited, measured)) => measured[*visited - 1] = subtree,
                        None => return Ok(subtree),
                    }
                    continue;
                }
            };
            *visited += 1;

            if let Some(child) = node.child(side) {
                match child.parent() {
                    Some(parent) if parent.ptr_eq(node) => {}
                    _ => return Err(Violation::ParentLink),
                }
                self.check_value(&child)?;
                stack.push((child, 0, [Subtree::EMPTY; 2]));
            }
        }
        shared::unreachable!("post-order walk returns at its root")
    }

    fn check_value(&self, node: &NodeRef<K, V>) -> Result<(), Violation> {
        if *node.value() == self.null_value {
            return Err(Violation::NullValue);
        }
        Ok(())
    }

    fn find_node<Q>(&self, key: &Q) -> Option<NodeRef<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.clone();
        while let Some(node) = current {
            let ordering = key.cmp(Borrow::<Q>::borrow(&*node.key()));
            current = match ordering {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }
}

impl<K, V, B> Drop for Tree<K, V, B> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V: Default, B> Default for Tree<K, V, B> {
    fn default() -> Self {
        Tree::new(V::default())
    }
}

/// Deep copy by level-order re-insertion.
impl<K: Ord + Clone, V: PartialEq + Clone, B: Balance> Clone for Tree<K, V, B> {
    fn clone(&self) -> Self {
        self.rebuild()
    }
}

/// Positional equality over the level-order node sequences. The balancing
/// strategy and the null value don't take part.
impl<K: PartialEq, V: PartialEq, B, B2> PartialEq<Tree<K, V, B2>> for Tree<K, V, B> {
    fn eq(&self, other: &Tree<K, V, B2>) -> bool {
        if self.size != other.size {
            return false;
        }

        let lhs = self.level_order_nodes();
        let rhs = other.level_order_nodes();
        lhs.len() == rhs.len() && lhs.iter().zip(&rhs).all(|(l, r)| l.entry_eq(r))
    }
}

impl<K: Eq, V: Eq, B> Eq for Tree<K, V, B> {}

impl<K: Ord, V: PartialEq, B: Balance> Extend<(K, V)> for Tree<K, V, B> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add_or_update_node(key, value);
        }
    }
}

impl<'a, K: Clone, V: Clone, B> IntoIterator for &'a Tree<K, V, B> {
    type Item = (K, V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, B> fmt::Debug for Tree<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        let mut current = self.root.clone().map(NodeRef::leftmost);
        while let Some(node) = current {
            map.entry(&*node.key(), &*node.value());
            current = node.next_in_order();
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;
    use rand::Rng;

    use super::*;
    use crate::node::Augment;
    use crate::{Avl, BinarySearchTree, RedBlack};

    fn plain(keys: &[i32]) -> BinarySearchTree<i32, &'static str> {
        let mut tree = Tree::new("");
        for &key in keys {
            assert!(tree.add_or_update_node(key, "v"));
        }
        tree
    }

    #[test]
    fn insert_update_and_null_value() {
        let mut tree = BinarySearchTree::new("");
        assert!(tree.add_or_update_node(5, "a"));
        assert!(!tree.add_or_update_node(5, "b"));
        assert_eq!(tree.get_node_value(&5), "b");
        assert_eq!(tree.get_node_value(&6), "");

        assert!(!tree.add_or_update_node(6, ""));
        assert!(!tree.add_or_update_node(5, ""));
        assert_eq!(tree.get_node_value(&5), "b");
        assert_eq!(tree.size(), 1);
        assert!(!tree.contains_key(&6));
    }

    #[test]
    fn remove_leaf_single_and_two_children() {
        let mut tree = plain(&[5, 3, 8, 1, 4]);
        assert_eq!(tree.structure().to_string(), "5:ROOT/3:5/8:5/1:3/4:3");

        assert!(tree.remove_node(&3));
        assert_eq!(tree.structure().to_string(), "5:ROOT/4:5/8:5/1:4");

        assert!(tree.remove_node(&5));
        assert_eq!(tree.structure().to_string(), "8:ROOT/4:8/1:4");

        assert!(!tree.remove_node(&5));
        assert_eq!(tree.remove_entry(&8), Some((8, "v")));
        assert_eq!(tree.structure().to_string(), "4:ROOT/1:4");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn lookups_and_extremes() {
        let mut tree = BinarySearchTree::new(0);
        assert_eq!(tree.first_key_value(), None);
        assert!(tree.last() == tree.end());

        tree.extend([(5, 50), (2, 20), (9, 90), (7, 70)]);
        assert_eq!(tree.get(&7), Some(70));
        assert_eq!(tree.get(&8), None);
        assert_eq!(tree.get_node_value(&8), 0);
        assert_eq!(tree.first_key_value(), Some((2, 20)));
        assert_eq!(tree.last_key_value(), Some((9, 90)));
    }

    #[test]
    fn lookups_borrow_the_key() {
        let mut tree: BinarySearchTree<String, u32> = Tree::new(0);
        tree.add_or_update_node("b".to_string(), 2);
        tree.add_or_update_node("a".to_string(), 1);

        assert_eq!(tree.get_node_value("a"), 1);
        assert_eq!(tree.get("z"), None);
        assert!(tree.contains_key("b"));
        assert!(tree.find("b") != tree.end());
        assert!(tree.find_mut("a").set_value(10));
        assert_eq!(tree.remove_entry("a"), Some(("a".to_string(), 10)));
        assert!(tree.remove_node("b"));
        assert!(tree.is_empty());
    }

    #[test]
    fn remove_last_node() {
        let mut tree = plain(&[1]);
        assert!(tree.remove_node(&1));
        assert!(tree.is_empty());
        assert!(tree.begin() == tree.end());
        assert_eq!(tree.structure().to_string(), "");
    }

    #[test]
    fn rotations_keep_order_and_root() {
        let mut tree = plain(&[4, 2, 6, 1, 3, 5, 7]);
        let root = tree.root.clone().unwrap();

        tree.rotate_left(&root);
        assert_eq!(
            tree.structure().to_string(),
            "6:ROOT/4:6/7:6/2:4/5:4/1:2/3:2"
        );
        assert_eq!(tree.validate(), Ok(()));

        let root = tree.root.clone().unwrap();
        tree.rotate_right(&root);
        assert_eq!(
            tree.structure().to_string(),
            "4:ROOT/2:4/6:4/1:2/3:2/5:6/7:6"
        );

        let two = tree.find_node(&2).unwrap();
        tree.rotate_right(&two);
        assert_eq!(
            tree.structure().to_string(),
            "4:ROOT/1:4/6:4/2:1/5:6/7:6/3:2"
        );
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    #[should_panic]
    fn rotation_without_pivot_panics() {
        let mut tree = plain(&[4, 2]);
        let leaf = tree.find_node(&2).unwrap();
        tree.rotate_left(&leaf);
    }

    #[test]
    fn merge_disjoint_trees() {
        let mut target = BinarySearchTree::new("");
        for key in [10, 5, 15, 3, 7, 12, 18, 1] {
            target.add_or_update_node(key, "T");
        }
        let mut source = BinarySearchTree::new("");
        for key in [2, 4, 6, 8, 11, 13, 16, 19, 20] {
            source.add_or_update_node(key, "S");
        }

        let mut expected = target.clone();
        expected.extend(source.level_order());

        assert_eq!(target.merge_tree(&mut source), Ok(()));
        assert_eq!(target.len(), 17);
        assert_eq!(source.len(), 0);
        assert!(source.is_empty());
        assert!(target == expected);
        assert_eq!(target.validate(), Ok(()));
    }

    #[test]
    fn merge_rejects_different_null_values() {
        let mut target = plain(&[1, 2]);
        let mut source = BinarySearchTree::new("-");
        source.add_or_update_node(3, "v");

        assert_eq!(
            target.merge_tree(&mut source),
            Err(MergeError::NullValueMismatch)
        );
        assert_eq!(target.len(), 2);
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn merge_across_strategies() {
        let mut target: Tree<i32, &str, RedBlack> = Tree::new("");
        let mut source: Tree<i32, &str, Avl> = Tree::new("");
        for key in 0..20 {
            target.add_or_update_node(key * 2, "even");
            source.add_or_update_node(key * 2 + 1, "odd");
        }
        source.add_or_update_node(0, "overwritten");

        target.merge_tree(&mut source).unwrap();
        assert_eq!(target.len(), 40);
        assert_eq!(target.get_node_value(&0), "overwritten");
        assert!(source.is_empty());
        assert_eq!(target.validate(), Ok(()));
    }

    #[test]
    fn clear_and_reuse() {
        let mut tree = plain(&[3, 1, 2]);
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert!(tree.begin() == tree.end());
        assert!(tree.add_or_update_node(1, "again"));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn degenerate_tree_drops_without_recursion() {
        let mut tree = BinarySearchTree::new(0);
        for key in 0..5_000 {
            tree.add_or_update_node(key, 1);
        }
        assert_eq!(tree.len(), 5_000);
        drop(tree);
    }

    #[test]
    fn degenerate_tree_validates_without_recursion() {
        // Linked by hand: ascending inserts into a list-shaped tree are quadratic.
        let root = NodeRef::new(0, 1, Augment::Plain);
        let mut last = root.clone();
        for key in 1..100_000 {
            let node = NodeRef::new(key, 1, Augment::Plain);
            last.set_child(Side::Right, Some(node.clone()));
            last = node;
        }

        let mut tree = BinarySearchTree::new(0);
        tree.root = Some(root);
        tree.size = 100_000;
        assert_eq!(tree.validate(), Ok(()));

        last.replace_value(0);
        assert_eq!(tree.validate(), Err(Violation::NullValue));
        last.replace_value(1);

        assert!(tree.add_or_update_node(100_000, 1));
        assert_eq!(tree.validate(), Ok(()));
        assert_eq!(tree.get(&99_999), Some(1));
    }

    #[test]
    fn equality_is_positional() {
        assert!(plain(&[2, 1, 3]) == plain(&[2, 3, 1]));
        assert!(plain(&[2, 1, 3]) != plain(&[1, 2, 3]));

        let mut other = plain(&[2, 1, 3]);
        other.add_or_update_node(3, "w");
        assert!(plain(&[2, 1, 3]) != other);
        assert!(plain(&[]) == plain(&[]));
    }

    #[test]
    fn clone_is_deep() {
        let mut tree = plain(&[5, 2, 8]);
        let copy = tree.clone();
        tree.add_or_update_node(2, "changed");
        tree.remove_node(&8);

        assert_eq!(copy.get_node_value(&2), "v");
        assert!(copy.contains_key(&8));
        assert_eq!(copy.structure().to_string(), "5:ROOT/2:5/8:5");
    }

    #[test]
    fn insert_then_remove_restores_shape() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut keys: Vec<i32> = (-100..100).collect();
            keys.shuffle(&mut rng);
            let count = rng.gen_range(0..60);
            let mut tree = plain(&keys[..count]);

            let before = tree.structure().to_string();
            let key = keys[rng.gen_range(count..keys.len())];
            assert!(tree.add_or_update_node(key, "new"));
            assert!(tree.remove_node(&key));

            assert_eq!(tree.structure().to_string(), before);
            assert_eq!(tree.len(), count);
        }
    }

    #[test]
    fn conversion_between_strategies() {
        let tree = plain(&[1, 2, 3, 4, 5, 6, 7]);

        let avl: Tree<_, _, Avl> = tree.rebuild();
        assert_eq!(avl.validate(), Ok(()));
        assert_eq!(avl.structure().to_string(), "4:ROOT/2:4/6:4/1:2/3:2/5:6/7:6");

        let red_black = tree.into_balance::<RedBlack>();
        assert_eq!(red_black.validate(), Ok(()));
        assert_eq!(red_black.len(), 7);
        assert!(red_black.iter().map(|(k, _)| k).eq(1..=7));
    }

    #[test]
    fn validate_reports_violations() {
        let tree = plain(&[2, 1, 3]);
        tree.find_node(&1).unwrap().replace_value("");
        assert_eq!(tree.validate(), Err(Violation::NullValue));

        let mut tree = plain(&[2, 1, 3]);
        tree.size = 4;
        assert_eq!(
            tree.validate(),
            Err(Violation::Size {
                recorded: 4,
                counted: 3
            })
        );
    }

    #[test]
    fn debug_lists_entries_in_order() {
        let tree = plain(&[2, 3, 1]);
        assert_eq!(format!("{:?}", tree), r#"{1: "v", 2: "v", 3: "v"}"#);
    }
}
