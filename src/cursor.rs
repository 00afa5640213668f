use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::balance::Balance;
use crate::node::NodeRef;
use crate::shared::Ref;
use crate::tree::Tree;

/// Forward in-order position in a tree, or past the end.
///
/// The tree stays borrowed for as long as the cursor lives, so it can't
/// be modified underneath it.
pub struct Cursor<'a, K, V> {
    node: Option<NodeRef<K, V>>,
    _tree: PhantomData<&'a NodeRef<K, V>>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(node: Option<NodeRef<K, V>>) -> Self {
        Cursor {
            node,
            _tree: PhantomData,
        }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    pub fn key(&self) -> Option<Ref<'_, K>> {
        self.node.as_ref().map(NodeRef::key)
    }

    pub fn value(&self) -> Option<Ref<'_, V>> {
        self.node.as_ref().map(NodeRef::value)
    }

    /// Clones out the current entry.
    pub fn entry(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let node = self.node.as_ref()?;
        let entry = (node.key().clone(), node.value().clone());
        Some(entry)
    }

    /// Advances to the in-order successor. Does nothing at the end.
    pub fn move_next(&mut self) {
        if let Some(node) = self.node.take() {
            self.node = node.next_in_order();
        }
    }
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        Cursor::new(self.node.clone())
    }
}

/// Cursors are equal when they point at the same node, or are both at the end.
impl<'a, K, V> PartialEq for Cursor<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.node, &other.node) {
            (Some(lhs), Some(rhs)) => lhs.ptr_eq(rhs),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<'a, K, V> Eq for Cursor<'a, K, V> {}

impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => write!(f, "Cursor({:?}: {:?})", &*node.key(), &*node.value()),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// A cursor that can overwrite values and remove entries.
pub struct CursorMut<'a, K, V, B> {
    tree: &'a mut Tree<K, V, B>,
    node: Option<NodeRef<K, V>>,
}

impl<'a, K, V, B> CursorMut<'a, K, V, B> {
    pub(crate) fn new(tree: &'a mut Tree<K, V, B>, node: Option<NodeRef<K, V>>) -> Self {
        CursorMut { tree, node }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    pub fn key(&self) -> Option<Ref<'_, K>> {
        self.node.as_ref().map(NodeRef::key)
    }

    pub fn value(&self) -> Option<Ref<'_, V>> {
        self.node.as_ref().map(NodeRef::value)
    }

    pub fn move_next(&mut self) {
        if let Some(node) = self.node.take() {
            self.node = node.next_in_order();
        }
    }

    /// Overwrites the current value. Refuses the tree's null value and
    /// does nothing at the end; both cases return `false`.
    pub fn set_value(&mut self, value: V) -> bool
    where
        V: PartialEq,
    {
        match &self.node {
            Some(node) if value != *self.tree.null_value() => {
                node.replace_value(value);
                true
            }
            _ => false,
        }
    }
}

impl<'a, K, V, B: Balance> CursorMut<'a, K, V, B> {
    /// Removes the current entry and moves to its in-order successor.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let node = self.node.take()?;
        // With two children the node survives holding its successor's entry.
        self.node = if node.left().is_some() && node.right().is_some() {
            Some(node.clone())
        } else {
            node.next_in_order()
        };
        Some(self.tree.remove_at(node))
    }
}

/// In-order iterator over cloned entries.
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(cursor: Cursor<'a, K, V>, remaining: usize) -> Self {
        Iter { cursor, remaining }
    }
}

impl<'a, K: Clone, V: Clone> Iterator for Iter<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.entry()?;
        self.cursor.move_next();
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: Clone, V: Clone> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K: Clone, V: Clone> FusedIterator for Iter<'a, K, V> {}
