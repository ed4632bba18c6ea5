use std::cmp::Ordering;
use std::fmt::Debug;

use crate::{
    Color, KeyCompare, NodeLabel, NodeOrd, NodeRead, NodeRef, NodeWrite, Path, Side,
    TreeDebugOperations, TreeReadOperations, TreeResult, TreeShape, TreeWriteOperations,
};

/// Slot of the guard in every column.
pub const COLUMNAR_GUARD: usize = 0;

/// A tree whose node fields live in parallel, caller owned columns. Node
/// handles are slot numbers, `usize::MAX` is NULL. Slot 0 is the guard and
/// its key is never compared.
pub struct ColumnarTree<'a, K: Ord> {
    left: &'a mut [usize],
    right: &'a mut [usize],
    colors: &'a mut [Color],
    keys: &'a mut [K],
}

impl<'a, K: Ord> ColumnarTree<'a, K> {
    /// Wrap columns that already hold a well formed tree.
    pub fn new(
        left: &'a mut [usize],
        right: &'a mut [usize],
        colors: &'a mut [Color],
        keys: &'a mut [K],
    ) -> Self {
        debug_assert!(!keys.is_empty());
        debug_assert_eq!(left.len(), keys.len());
        debug_assert_eq!(right.len(), keys.len());
        debug_assert_eq!(colors.len(), keys.len());
        ColumnarTree {
            left,
            right,
            colors,
            keys,
        }
    }

    /// Wrap the columns and reset them to an empty tree.
    pub fn create(
        left: &'a mut [usize],
        right: &'a mut [usize],
        colors: &'a mut [Color],
        keys: &'a mut [K],
    ) -> Self {
        let mut tree: ColumnarTree<'a, K> = ColumnarTree::new(left, right, colors, keys);
        tree.init(COLUMNAR_GUARD);
        tree
    }

    pub fn capacity(&self) -> usize {
        self.keys.len() - 1
    }

    pub fn key(&self, slot: usize) -> &K {
        &self.keys[slot]
    }

    /// Store key in the unused slot and link it. Returns false and leaves
    /// the slot untouched when an equal key is already present.
    pub fn insert(&mut self, slot: usize, key: K) -> bool {
        debug_assert!(slot != COLUMNAR_GUARD && slot < self.keys.len());
        let mut path: Path<usize> = Path::new();
        if self.search(&mut path, COLUMNAR_GUARD, &key).is_found() {
            return false;
        }
        self.keys[slot] = key;
        TreeWriteOperations::insert(self, &path, slot);
        true
    }

    /// Unlink the slot holding key and return it.
    pub fn remove(&mut self, key: &K) -> Option<usize> {
        let mut path: Path<usize> = Path::new();
        if !self.search(&mut path, COLUMNAR_GUARD, key).is_found() {
            return None;
        }
        Some(self.delete(&mut path))
    }

    /// Move the entry with an equal key into the unused `slot`, which takes
    /// over its links and color. Returns the displaced slot.
    pub fn replace(&mut self, slot: usize, key: K) -> Option<usize> {
        let mut path: Path<usize> = Path::new();
        if !self.search(&mut path, COLUMNAR_GUARD, &key).is_found() {
            return None;
        }
        self.keys[slot] = key;
        Some(TreeWriteOperations::replace(self, &mut path, slot))
    }

    pub fn find(&self, key: &K) -> Option<usize> {
        let mut path: Path<usize> = Path::new();
        self.search(&mut path, COLUMNAR_GUARD, key)
            .is_found()
            .then(|| path.current())
    }

    /// Slots in ascending key order.
    pub fn slots(&self) -> Vec<usize> {
        let mut slots: Vec<usize> = Vec::new();
        let mut path: Path<usize> = Path::new();
        let mut slot: usize = self.first(&mut path, COLUMNAR_GUARD);
        while !slot.is_null() {
            slots.push(slot);
            slot = TreeReadOperations::next(self, &mut path);
        }
        slots
    }

    pub fn verify(&self) -> TreeResult<TreeShape>
    where
        K: Debug,
    {
        self.verify_rb_tree(COLUMNAR_GUARD)
    }
}

impl<'a, K: Ord> NodeRead for ColumnarTree<'a, K> {
    type Ref = usize;

    fn child(&self, node: usize, side: Side) -> usize {
        match side {
            Side::Left => self.left[node],
            Side::Right => self.right[node],
            Side::Match => unreachable!(),
        }
    }

    fn color(&self, node: usize) -> Color {
        self.colors[node]
    }
}

impl<'a, K: Ord> NodeWrite for ColumnarTree<'a, K> {
    fn set_child(&mut self, node: usize, side: Side, child: usize) {
        match side {
            Side::Left => self.left[node] = child,
            Side::Right => self.right[node] = child,
            Side::Match => unreachable!(),
        }
    }

    fn set_color(&mut self, node: usize, color: Color) {
        self.colors[node] = color;
    }
}

impl<'a, K: Ord> KeyCompare<K> for ColumnarTree<'a, K> {
    fn compare(&self, key: &K, node: usize) -> Ordering {
        debug_assert_ne!(node, COLUMNAR_GUARD);
        key.cmp(&self.keys[node])
    }
}

impl<'a, K: Ord> NodeOrd for ColumnarTree<'a, K> {
    fn cmp_nodes(&self, a: usize, b: usize) -> Ordering {
        self.keys[a].cmp(&self.keys[b])
    }
}

impl<'a, K: Ord + Debug> NodeLabel for ColumnarTree<'a, K> {
    fn fmt_label(&self, node: usize, out: &mut dyn std::fmt::Write) -> std::fmt::Result {
        write!(out, "{:?}", self.keys[node])
    }
}
