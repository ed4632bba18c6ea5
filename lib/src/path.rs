use crate::{NodeRef, Side};

/// Maximum tree height a [`Path`] can record by default. A red-black tree
/// of height 64 holds at least 2^32 - 1 nodes.
pub const DEPTH_LIMIT: usize = 64;

/// Bounded ancestor cursor.
///
/// `nodes[0]` is always the guard and `sides[0]` is always [`Side::Left`]
/// (the guard's left child is the root). For `0 < i <= depth`, `nodes[i]` is
/// the child of `nodes[i - 1]` on `sides[i - 1]`. `sides[depth]` is either
/// [`Side::Match`] when the path points at a node, or the side a new child
/// would be attached on after an unsuccessful search.
///
/// A path is scratch state for one search-then-act sequence. Mutating the
/// tree through anything other than the path invalidates it.
#[derive(Clone)]
pub struct Path<R: NodeRef, const D: usize = DEPTH_LIMIT> {
    nodes: [R; D],
    sides: [Side; D],
    depth: usize,
}

impl<R: NodeRef, const D: usize> Default for Path<R, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: NodeRef, const D: usize> Path<R, D> {
    pub fn new() -> Self {
        Path {
            nodes: [R::NULL; D],
            sides: [Side::Left; D],
            depth: 0,
        }
    }

    /// Start over at the guard.
    pub(crate) fn reset(&mut self, guard: R) {
        self.nodes[0] = guard;
        self.sides[0] = Side::Left;
        self.depth = 0;
    }

    /// Append a node one level below the current end.
    ///
    /// Running out of levels means the tree is not balanced or the limit is
    /// too small for the data, neither of which can be recovered from.
    #[inline]
    pub(crate) fn push(&mut self, node: R) {
        assert!(
            self.depth + 1 < D,
            "tree path exceeded its depth limit of {D}"
        );
        self.depth += 1;
        self.nodes[self.depth] = node;
    }

    #[inline]
    pub(crate) fn set_node(&mut self, index: usize, node: R) {
        self.nodes[index] = node;
    }

    #[inline]
    pub(crate) fn set_side(&mut self, index: usize, side: Side) {
        self.sides[index] = side;
    }

    #[inline]
    pub(crate) fn set_depth(&mut self, depth: usize) {
        debug_assert!(depth < D);
        self.depth = depth;
    }

    /// Index of the last recorded entry. Zero means only the guard.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub const fn capacity(&self) -> usize {
        D
    }

    #[inline]
    pub fn node(&self, index: usize) -> R {
        debug_assert!(index <= self.depth);
        self.nodes[index]
    }

    #[inline]
    pub fn side(&self, index: usize) -> Side {
        debug_assert!(index <= self.depth);
        self.sides[index]
    }

    pub fn guard(&self) -> R {
        self.nodes[0]
    }

    /// Node at the end of the path. The guard when the path is empty.
    #[inline]
    pub fn current(&self) -> R {
        self.nodes[self.depth]
    }

    /// Whether the path ends on a node rather than an insertion point.
    pub fn is_match(&self) -> bool {
        self.depth > 0 && self.sides[self.depth] == Side::Match
    }

    /// Overwrite this path with the recorded entries of another.
    pub fn copy_from(&mut self, other: &Path<R, D>) {
        let len: usize = other.depth + 1;
        self.nodes[..len].copy_from_slice(&other.nodes[..len]);
        self.sides[..len].copy_from_slice(&other.sides[..len]);
        self.depth = other.depth;
    }

    /// Recorded `(node, side)` pairs from the guard down.
    pub fn iter(&self) -> impl Iterator<Item = (R, Side)> + '_ {
        self.nodes[..=self.depth]
            .iter()
            .copied()
            .zip(self.sides[..=self.depth].iter().copied())
    }
}

impl<R: NodeRef, const D: usize> std::fmt::Debug for Path<R, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{DataIndex, NIL};

    #[test]
    fn test_new_path_is_empty() {
        let path: Path<DataIndex> = Path::new();
        assert_eq!(path.depth(), 0);
        assert_eq!(path.capacity(), DEPTH_LIMIT);
        assert_eq!(path.current(), NIL);
        assert!(!path.is_match());
    }

    #[test]
    fn test_push_and_copy() {
        let mut path: Path<DataIndex, 8> = Path::new();
        path.reset(0);
        path.set_side(0, Side::Left);
        path.push(10);
        path.set_side(1, Side::Right);
        path.push(20);
        path.set_side(2, Side::Match);

        assert!(path.is_match());
        assert_eq!(path.current(), 20);
        assert_eq!(path.guard(), 0);

        let mut copy: Path<DataIndex, 8> = Path::new();
        copy.copy_from(&path);
        assert_eq!(copy.depth(), 2);
        assert_eq!(
            copy.iter().collect::<Vec<_>>(),
            vec![(0, Side::Left), (10, Side::Right), (20, Side::Match)]
        );
    }

    #[test]
    #[should_panic(expected = "depth limit")]
    fn test_push_past_limit() {
        let mut path: Path<DataIndex, 4> = Path::new();
        path.reset(0);
        for i in 1..5 {
            path.push(i);
        }
    }
}
