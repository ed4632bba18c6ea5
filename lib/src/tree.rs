use crate::{trace, Color, KeyCompare, NodeRead, NodeRef, NodeWrite, Path, Side};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Found,
    NotFound,
}

impl SearchResult {
    pub fn is_found(self) -> bool {
        self == SearchResult::Found
    }
}

// Every operation works through a guard: a caller owned node whose left
// child is the root. Nothing here allocates, recurses or needs parent links,
// the path carries the ancestor chain instead.
pub trait TreeReadOperations: NodeRead {
    /// Root of the tree hanging off `guard`.
    fn root(&self, guard: Self::Ref) -> Self::Ref {
        self.child(guard, Side::Left)
    }

    /// Descend from the root towards `key`, recording every step.
    fn search<K: ?Sized, const D: usize>(
        &self,
        path: &mut Path<Self::Ref, D>,
        guard: Self::Ref,
        key: &K,
    ) -> SearchResult
    where
        Self: KeyCompare<K>,
    {
        path.reset(guard);
        let mut current: Self::Ref = self.root(guard);
        while !current.is_null() {
            path.push(current);
            let side: Side = Side::from_ordering(self.compare(key, current));
            path.set_side(path.depth(), side);
            if side == Side::Match {
                return SearchResult::Found;
            }
            current = self.child(current, side);
        }
        SearchResult::NotFound
    }

    /// Walk down `side` as far as possible. Returns NULL on an empty tree.
    fn extreme<const D: usize>(
        &self,
        path: &mut Path<Self::Ref, D>,
        guard: Self::Ref,
        side: Side,
    ) -> Self::Ref {
        debug_assert_ne!(side, Side::Match);
        path.reset(guard);
        let mut current: Self::Ref = self.root(guard);
        while !current.is_null() {
            path.push(current);
            path.set_side(path.depth(), side);
            current = self.child(current, side);
        }
        if path.depth() == 0 {
            return Self::Ref::NULL;
        }
        path.set_side(path.depth(), Side::Match);
        path.current()
    }

    fn first<const D: usize>(&self, path: &mut Path<Self::Ref, D>, guard: Self::Ref) -> Self::Ref {
        self.extreme(path, guard, Side::Left)
    }

    fn last<const D: usize>(&self, path: &mut Path<Self::Ref, D>, guard: Self::Ref) -> Self::Ref {
        self.extreme(path, guard, Side::Right)
    }

    /// Move the path one in-order step towards `side`: `Right` for the
    /// successor, `Left` for the predecessor. Returns NULL, leaving the path
    /// untouched, when there is no such node.
    fn step<const D: usize>(&self, path: &mut Path<Self::Ref, D>, side: Side) -> Self::Ref {
        debug_assert_ne!(side, Side::Match);
        let mut depth: usize = path.depth();
        if depth == 0 {
            return Self::Ref::NULL;
        }

        let mut current: Self::Ref = self.child(path.current(), side);
        if !current.is_null() {
            // Into the subtree on `side`, then all the way the other way.
            let back: Side = side.opposite();
            path.set_side(depth, side);
            while !current.is_null() {
                path.push(current);
                path.set_side(path.depth(), back);
                current = self.child(current, back);
            }
            depth = path.depth();
        } else {
            // Up past every ancestor we left through `side`.
            loop {
                depth -= 1;
                if depth == 0 {
                    return Self::Ref::NULL;
                }
                if path.side(depth) != side {
                    break;
                }
            }
        }
        path.set_side(depth, Side::Match);
        path.set_depth(depth);
        path.current()
    }

    fn next<const D: usize>(&self, path: &mut Path<Self::Ref, D>) -> Self::Ref {
        self.step(path, Side::Right)
    }

    fn prev<const D: usize>(&self, path: &mut Path<Self::Ref, D>) -> Self::Ref {
        self.step(path, Side::Left)
    }

    /// Position the path on the first node whose key is not less than `key`.
    fn seek<K: ?Sized, const D: usize>(
        &self,
        path: &mut Path<Self::Ref, D>,
        guard: Self::Ref,
        key: &K,
    ) -> Self::Ref
    where
        Self: KeyCompare<K>,
    {
        if self.search(path, guard, key).is_found() {
            return path.current();
        }
        let depth: usize = path.depth();
        if depth == 0 {
            return Self::Ref::NULL;
        }
        // The last node visited is either just above or just below the key.
        match path.side(depth) {
            Side::Left => {
                path.set_side(depth, Side::Match);
                path.current()
            }
            _ => {
                path.set_side(depth, Side::Match);
                self.next(path)
            }
        }
    }
}

impl<T: NodeRead> TreeReadOperations for T {}

pub trait TreeWriteOperations: TreeReadOperations + NodeWrite {
    /// Make `guard` the anchor of an empty tree.
    fn init(&mut self, guard: Self::Ref) {
        self.set_child(guard, Side::Left, Self::Ref::NULL);
        self.set_child(guard, Side::Right, Self::Ref::NULL);
        self.set_color(guard, Color::Black);
    }

    /// Link `node` at the insertion point recorded by an unsuccessful
    /// [`search`](TreeReadOperations::search) and rebalance.
    fn insert<const D: usize>(&mut self, path: &Path<Self::Ref, D>, node: Self::Ref) {
        debug_assert!(!node.is_null());
        debug_assert!(!path.is_match());
        debug_assert!(
            path.depth() + 1 < path.capacity(),
            "tree path exceeded its depth limit of {D}"
        );
        trace!("TREE insert {node:?} at depth {}", path.depth());

        let mut index: usize = path.depth();
        self.set_child(node, Side::Left, Self::Ref::NULL);
        self.set_child(node, Side::Right, Self::Ref::NULL);
        self.set_color(node, Color::Red);
        self.set_child(path.node(index), path.side(index), node);

        let mut node: Self::Ref = node;
        while index > 0 {
            let mut parent: Self::Ref = path.node(index);
            if self.color(parent) == Color::Black {
                return;
            }
            // A red parent is never the root, so the grandparent is a real node.
            debug_assert!(index >= 2);
            index -= 1;
            let grandparent: Self::Ref = path.node(index);
            let grandparent_side: Side = path.side(index);
            let uncle: Self::Ref = self.child(grandparent, grandparent_side.opposite());

            // Red uncle: push the red up two levels.
            if self.is_red(uncle) {
                trace!("FIX red uncle {uncle:?} under {grandparent:?}");
                self.set_color(grandparent, Color::Red);
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                node = grandparent;
                index -= 1;
                continue;
            }

            // Zig-zag: rotate node above parent so both lean the same way.
            let parent_side: Side = path.side(index + 1);
            if parent_side != grandparent_side {
                trace!("FIX zig-zag {node:?} over {parent:?}");
                self.set_child(grandparent, grandparent_side, node);
                let inner: Self::Ref = self.child(node, grandparent_side);
                self.set_child(parent, parent_side, inner);
                self.set_child(node, grandparent_side, parent);
                std::mem::swap(&mut node, &mut parent);
            }

            // Same side: rotate parent above grandparent.
            trace!("FIX rotate {parent:?} over {grandparent:?}");
            let outer: Side = grandparent_side.opposite();
            let moved: Self::Ref = self.child(parent, outer);
            self.set_child(parent, outer, grandparent);
            self.set_color(parent, Color::Black);
            self.set_child(grandparent, grandparent_side, moved);
            self.set_color(grandparent, Color::Red);
            self.set_child(path.node(index - 1), path.side(index - 1), parent);
            return;
        }
        // Fixup reached the guard, so node is the root.
        self.set_color(node, Color::Black);
    }

    /// Unlink the node matched by a successful search and rebalance.
    /// Returns the unlinked node so the caller can reclaim it.
    ///
    /// A node with two children trades places with its in-order successor
    /// first: child links and colors are exchanged, keys stay with their
    /// nodes. The path is consumed.
    fn delete<const D: usize>(&mut self, path: &mut Path<Self::Ref, D>) -> Self::Ref {
        debug_assert!(path.is_match());
        let target_depth: usize = path.depth();
        let target: Self::Ref = path.current();
        trace!("TREE delete {target:?} at depth {target_depth}");

        let target_left: Self::Ref = self.child(target, Side::Left);
        let target_right: Self::Ref = self.child(target, Side::Right);
        let depth: usize = if !target_left.is_null() && !target_right.is_null() {
            let successor: Self::Ref = self.next(path);
            let successor_depth: usize = path.depth();
            let target_color: Color = self.color(target);

            let successor_left: Self::Ref = self.child(successor, Side::Left);
            let successor_right: Self::Ref = self.child(successor, Side::Right);
            let successor_color: Color = self.color(successor);
            self.set_child(target, Side::Left, successor_left);
            self.set_child(target, Side::Right, successor_right);
            self.set_color(target, successor_color);

            // When the successor is the right child this briefly points the
            // successor at itself. The unlink below overwrites that link.
            self.set_child(successor, Side::Left, target_left);
            self.set_child(successor, Side::Right, target_right);
            self.set_color(successor, target_color);

            self.set_child(
                path.node(target_depth - 1),
                path.side(target_depth - 1),
                successor,
            );
            path.set_node(target_depth, successor);
            path.set_node(successor_depth, target);
            trace!("TREE swapped {target:?} with successor {successor:?}");
            successor_depth
        } else {
            target_depth
        };

        // target now has at most one child.
        let child: Self::Ref = if !self.child(target, Side::Left).is_null() {
            self.child(target, Side::Left)
        } else {
            self.child(target, Side::Right)
        };
        let parent: Self::Ref = path.node(depth - 1);
        let side: Side = path.side(depth - 1);

        if self.color(target) == Color::Red {
            // Equal black heights leave a red node with one child no room
            // for any child at all.
            debug_assert!(child.is_null());
            self.set_child(parent, side, Self::Ref::NULL);
            path.set_depth(0);
            return target;
        }
        if !child.is_null() {
            // A lone child under a black node must be red.
            debug_assert_eq!(self.color(child), Color::Red);
            self.set_child(parent, side, child);
            self.set_color(child, Color::Black);
            path.set_depth(0);
            return target;
        }
        self.set_child(parent, side, Self::Ref::NULL);
        self.delete_fix(path, depth - 1);
        path.set_depth(0);
        target
    }

    /// Repair a black height deficit on the `path.side(depth)` side of
    /// `path.node(depth)`, walking up until it is absorbed.
    #[doc(hidden)]
    fn delete_fix<const D: usize>(&mut self, path: &Path<Self::Ref, D>, depth: usize) {
        let mut depth: usize = depth;
        while depth > 0 {
            let parent: Self::Ref = path.node(depth);
            let near: Side = path.side(depth);
            let far: Side = near.opposite();
            let mut above: Self::Ref = path.node(depth - 1);
            let mut above_side: Side = path.side(depth - 1);
            // The sibling subtree is a black level taller, so never empty.
            let mut sibling: Self::Ref = self.child(parent, far);
            debug_assert!(!sibling.is_null());

            if self.color(sibling) == Color::Red {
                // Red sibling: rotate it above parent. The parent turns red
                // and the new sibling is black.
                trace!("FIX red sibling {sibling:?} of deficit under {parent:?}");
                let sibling_near: Self::Ref = self.child(sibling, near);
                self.set_child(above, above_side, sibling);
                self.set_child(parent, far, sibling_near);
                self.set_color(parent, Color::Red);
                self.set_child(sibling, near, parent);
                self.set_color(sibling, Color::Black);
                above = sibling;
                above_side = near;
                sibling = sibling_near;
            } else if self.color(parent) == Color::Black
                && self.is_black(self.child(sibling, Side::Left))
                && self.is_black(self.child(sibling, Side::Right))
            {
                // All black: shorten the sibling and move the deficit up.
                trace!("FIX black family at {parent:?}, moving up");
                self.set_color(sibling, Color::Red);
                depth -= 1;
                continue;
            }

            let mut sibling_near: Self::Ref = self.child(sibling, near);
            let mut sibling_far: Self::Ref = self.child(sibling, far);
            if self.color(parent) == Color::Red
                && self.is_black(sibling_near)
                && self.is_black(sibling_far)
            {
                // Red parent pays for the deficit.
                trace!("FIX recolor red parent {parent:?}");
                self.set_color(parent, Color::Black);
                self.set_color(sibling, Color::Red);
                return;
            }

            if self.is_red(sibling_near) && self.is_black(sibling_far) {
                // Near nephew red: rotate it above the sibling.
                trace!("FIX near nephew {sibling_near:?}");
                self.set_child(parent, far, sibling_near);
                let moved: Self::Ref = self.child(sibling_near, far);
                self.set_child(sibling, near, moved);
                self.set_color(sibling, Color::Red);
                self.set_child(sibling_near, far, sibling);
                self.set_color(sibling_near, Color::Black);
                sibling = sibling_near;
                sibling_near = self.child(sibling, near);
                sibling_far = self.child(sibling, far);
            }

            // Far nephew red: rotate the sibling above parent.
            debug_assert!(self.is_red(sibling_far));
            trace!("FIX far nephew {sibling_far:?}");
            self.set_child(above, above_side, sibling);
            self.set_child(parent, far, sibling_near);
            let parent_color: Color = self.color(parent);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            self.set_color(sibling_far, Color::Black);
            self.set_child(sibling, near, parent);
            return;
        }
    }

    /// Put `node` where the node matched by a successful search sits. The
    /// new node takes over children and color; the displaced node is
    /// returned. The caller keeps the ordering intact.
    fn replace<const D: usize>(&mut self, path: &mut Path<Self::Ref, D>, node: Self::Ref) -> Self::Ref {
        debug_assert!(path.is_match());
        debug_assert!(!node.is_null());
        let depth: usize = path.depth();
        let old: Self::Ref = path.current();
        trace!("TREE replace {old:?} with {node:?}");

        let left: Self::Ref = self.child(old, Side::Left);
        let right: Self::Ref = self.child(old, Side::Right);
        let color: Color = self.color(old);
        self.set_child(node, Side::Left, left);
        self.set_child(node, Side::Right, right);
        self.set_color(node, color);
        self.set_child(path.node(depth - 1), path.side(depth - 1), node);
        path.set_node(depth, node);
        old
    }
}

impl<T: NodeWrite> TreeWriteOperations for T {}
