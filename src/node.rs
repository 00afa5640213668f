use std::fmt;
use std::mem;

use arrayvec::ArrayVec;

use crate::shared::{self, RcCell, Ref, WeakCell};

/// Node color of a red-black tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Per-node data owned by the balancing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Augment {
    Plain,
    Height(usize),
    Color(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Strong handle to a tree node.
///
/// Only the parent's child slot (or the tree's root slot) keeps a handle
/// for longer than a single operation. Parents are referenced weakly, so
/// dropping the owning slot frees the whole subtree.
pub struct NodeRef<K, V>(RcCell<NodeData<K, V>>);

pub struct NodeData<K, V> {
    key: K,
    value: V,
    parent: Option<WeakCell<NodeData<K, V>>>,
    left: Option<NodeRef<K, V>>,
    right: Option<NodeRef<K, V>>,
    augment: Augment,
}

impl<K, V> NodeData<K, V> {
    fn slot(&mut self, side: Side) -> &mut Option<NodeRef<K, V>> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

impl<K, V> Clone for NodeRef<K, V> {
    fn clone(&self) -> Self {
        NodeRef(self.0.shallow_clone())
    }
}

#[cfg_attr(feature = "unchecked", allow(unused_mut))]
impl<K, V> NodeRef<K, V> {
    /// Creates a detached leaf.
    pub fn new(key: K, value: V, augment: Augment) -> Self {
        NodeRef(RcCell::new(NodeData {
            key,
            value,
            parent: None,
            left: None,
            right: None,
            augment,
        }))
    }

    pub fn ptr_eq(&self, rhs: &Self) -> bool {
        self.0.ptr_eq(&rhs.0)
    }

    pub fn key(&self) -> Ref<'_, K> {
        shared::map_ref(self.0.get(), |this| &this.key)
    }

    pub fn value(&self) -> Ref<'_, V> {
        shared::map_ref(self.0.get(), |this| &this.value)
    }

    pub fn replace_value(&self, value: V) -> V {
        mem::replace(&mut self.0.get_mut().value, value)
    }

    pub fn augment(&self) -> Augment {
        self.0.get().augment
    }

    pub fn set_augment(&self, augment: Augment) {
        self.0.get_mut().augment = augment;
    }

    pub fn height(&self) -> usize {
        match self.augment() {
            Augment::Height(height) => height,
            other => shared::unreachable!("expected a height, found {:?}", other),
        }
    }

    pub fn set_height(&self, height: usize) {
        self.set_augment(Augment::Height(height));
    }

    pub fn color(&self) -> Color {
        match self.augment() {
            Augment::Color(color) => color,
            other => shared::unreachable!("expected a color, found {:?}", other),
        }
    }

    pub fn set_color(&self, color: Color) {
        self.set_augment(Augment::Color(color));
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    pub fn left(&self) -> Option<Self> {
        self.0.get().left.clone()
    }

    pub fn right(&self) -> Option<Self> {
        self.0.get().right.clone()
    }

    pub fn child(&self, side: Side) -> Option<Self> {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    pub fn children(&self) -> ArrayVec<Self, 2> {
        let this = self.0.get();
        this.left.iter().chain(this.right.iter()).cloned().collect()
    }

    /// Puts `child` into the slot on `side` and points its parent here.
    /// The previous occupant is returned with its parent link untouched.
    pub fn set_child(&self, side: Side, child: Option<Self>) -> Option<Self> {
        if let Some(child) = &child {
            child.0.get_mut().parent = Some(self.0.downgrade());
        }
        mem::replace(self.0.get_mut().slot(side), child)
    }

    /// Empties the slot on `side` without touching the child's parent link.
    pub fn take_child(&self, side: Side) -> Option<Self> {
        self.0.get_mut().slot(side).take()
    }

    /// Detaches both children, clearing their parent links.
    pub fn take_children(&self) -> ArrayVec<Self, 2> {
        let mut children = ArrayVec::new();
        for side in [Side::Left, Side::Right] {
            if let Some(child) = self.take_child(side) {
                child.detach_parent();
                children.push(child);
            }
        }
        children
    }

    pub fn parent(&self) -> Option<Self> {
        let this = self.0.get();
        let parent = this.parent.as_ref()?;
        match parent.upgrade() {
            Some(parent) => Some(NodeRef(parent)),
            None => shared::unreachable!("parent dropped before its child"),
        }
    }

    pub fn detach_parent(&self) {
        self.0.get_mut().parent = None;
    }

    pub fn is_root(&self) -> bool {
        self.0.get().parent.is_none()
    }

    /// Which slot of the parent holds this node; `None` for the root.
    pub fn side(&self) -> Option<Side> {
        let parent = self.parent()?;
        let parent = parent.0.get();
        let holds = |slot: &Option<Self>| slot.as_ref().map_or(false, |node| node.ptr_eq(self));

        if holds(&parent.left) {
            Some(Side::Left)
        } else if holds(&parent.right) {
            Some(Side::Right)
        } else {
            shared::unreachable!("parent doesn't own its child")
        }
    }

    pub fn is_left_child(&self) -> bool {
        self.side() == Some(Side::Left)
    }

    pub fn is_right_child(&self) -> bool {
        self.side() == Some(Side::Right)
    }

    pub fn sibling(&self) -> Option<Self> {
        let side = self.side()?;
        self.parent()?.child(side.opposite())
    }

    pub fn grandparent(&self) -> Option<Self> {
        self.parent()?.parent()
    }

    pub fn uncle(&self) -> Option<Self> {
        self.parent()?.sibling()
    }

    pub fn leftmost(self) -> Self {
        let mut current = self;
        while let Some(left) = current.left() {
            current = left;
        }
        current
    }

    pub fn rightmost(self) -> Self {
        let mut current = self;
        while let Some(right) = current.right() {
            current = right;
        }
        current
    }

    /// Leftmost node of the right subtree.
    pub fn in_order_successor(&self) -> Option<Self> {
        self.right().map(Self::leftmost)
    }

    /// Next node of an in-order walk over the whole tree.
    pub fn next_in_order(&self) -> Option<Self> {
        if let Some(successor) = self.in_order_successor() {
            return Some(successor);
        }

        let mut current = self.clone();
        loop {
            match current.side()? {
                Side::Left => return current.parent(),
                Side::Right => current = current.parent()?,
            }
        }
    }

    /// Exchanges entries with the in-order successor and returns the
    /// successor, which now holds this node's old entry and has no left child.
    pub fn swap_entry_with_in_order_successor(&self) -> Option<Self> {
        let successor = self.in_order_successor()?;
        {
            let mut this = self.0.get_mut();
            let mut that = successor.0.get_mut();
            mem::swap(&mut this.key, &mut that.key);
            mem::swap(&mut this.value, &mut that.value);
        }
        Some(successor)
    }

    /// Unwraps a detached node. Panics if another handle is still alive.
    pub fn into_entry(self) -> (K, V) {
        match self.0.into_inner() {
            Some(data) => {
                shared::assume!(data.left.is_none() && data.right.is_none());
                (data.key, data.value)
            }
            None => shared::unreachable!("removed node is still referenced"),
        }
    }
}

impl<K: PartialEq, V: PartialEq> NodeRef<K, V> {
    /// Positional equality: same entry, and either both roots or both
    /// hanging on the same side of parents with equal keys.
    pub fn entry_eq(&self, rhs: &Self) -> bool {
        {
            let (this, that) = (self.0.get(), rhs.0.get());
            if this.key != that.key || this.value != that.value {
                return false;
            }
        }

        match (self.parent(), rhs.parent()) {
            (None, None) => true,
            (Some(this), Some(that)) => *this.key() == *that.key() && self.side() == rhs.side(),
            _ => false,
        }
    }
}

/// Height of an optional subtree; absent subtrees have height 0.
pub fn height<K, V>(node: Option<&NodeRef<K, V>>) -> usize {
    node.map_or(0, NodeRef::height)
}

/// Absent nodes are black leaves.
pub fn is_red<K, V>(node: Option<&NodeRef<K, V>>) -> bool {
    node.map_or(false, NodeRef::is_red)
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let this = self.0.get();
        f.debug_struct("Node")
            .field("key", &this.key)
            .field("value", &this.value)
            .field("augment", &this.augment)
            .finish()
    }
}
