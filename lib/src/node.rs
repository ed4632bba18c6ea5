use std::cmp::Ordering;
use std::fmt::Debug;
use std::ptr::NonNull;

use crate::{DataIndex, NIL};

/// Which way a path step went from a node, or `Match` when the step is the
/// operation's target itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
    Match,
}

impl Side {
    /// The mirror side. `Match` has no mirror.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Match => unreachable!("Match has no opposite side"),
        }
    }

    /// Child slot for a descent side.
    #[inline]
    pub fn slot(self) -> usize {
        debug_assert_ne!(self, Side::Match);
        self as usize
    }

    /// Side taken when a key compares against a node's key.
    #[inline]
    pub fn from_ordering(ordering: Ordering) -> Side {
        match ordering {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => Side::Match,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Black = 0,
    Red = 1,
}

/// Handle to a node. The tree only copies and compares handles, it never
/// creates or frees what they point at.
pub trait NodeRef: Copy + Eq + Debug {
    const NULL: Self;

    #[inline]
    fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl NodeRef for DataIndex {
    const NULL: Self = NIL;
}

impl NodeRef for usize {
    const NULL: Self = usize::MAX;
}

impl<T> NodeRef for Option<NonNull<T>> {
    const NULL: Self = None;
}

/// Read half of the node capability contract.
pub trait NodeRead {
    type Ref: NodeRef;

    fn child(&self, node: Self::Ref, side: Side) -> Self::Ref;
    fn color(&self, node: Self::Ref) -> Color;

    /// Null handles count as black leaves.
    #[inline]
    fn is_red(&self, node: Self::Ref) -> bool {
        !node.is_null() && self.color(node) == Color::Red
    }

    #[inline]
    fn is_black(&self, node: Self::Ref) -> bool {
        !self.is_red(node)
    }
}

/// Write half of the node capability contract.
pub trait NodeWrite: NodeRead {
    fn set_child(&mut self, node: Self::Ref, side: Side, child: Self::Ref);
    fn set_color(&mut self, node: Self::Ref, color: Color);
}

/// Orders a search key against the key stored in a node.
pub trait KeyCompare<K: ?Sized>: NodeRead {
    fn compare(&self, key: &K, node: Self::Ref) -> Ordering;
}

/// Orders two linked nodes by their keys. Only needed for verification.
pub trait NodeOrd: NodeRead {
    fn cmp_nodes(&self, a: Self::Ref, b: Self::Ref) -> Ordering;
}
