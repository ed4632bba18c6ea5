use std::cmp::Ordering;
use std::fmt::Write;

use crate::{
    trace, Color, NodeOrd, NodeRead, NodeRef, Path, Side, TreeError, TreeReadOperations,
    TreeResult,
};

/// How a store renders a node in diagnostic output.
pub trait NodeLabel: NodeRead {
    fn fmt_label(&self, node: Self::Ref, out: &mut dyn Write) -> std::fmt::Result;
}

/// Summary of a tree that passed verification.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TreeShape {
    pub len: usize,
    /// Nodes on the longest root to leaf path.
    pub height: usize,
    /// Black nodes on every root to NULL path.
    pub black_height: usize,
}

pub trait TreeDebugOperations: TreeReadOperations + NodeLabel {
    /// Sideways rendering of the tree, largest key on top, one node per line.
    fn debug_string(&self, guard: Self::Ref) -> String {
        let mut out: String = String::new();
        let mut path: Path<Self::Ref> = Path::new();
        let mut current: Self::Ref = self.last(&mut path, guard);
        while !current.is_null() {
            let depth: usize = path.depth();
            out += &"  ".repeat(depth - 1);
            out += if depth == 1 {
                "- "
            } else if path.side(depth - 1) == Side::Left {
                "└ "
            } else {
                "┌ "
            };
            out.push(if self.color(current) == Color::Black { 'B' } else { 'R' });
            out.push(':');
            let _ = self.fmt_label(current, &mut out);
            out.push('\n');
            current = self.prev(&mut path);
        }
        out
    }

    /// Render the steps of a path, e.g. `[10 -left-> 5 -right-> 6]`.
    fn path_string<const D: usize>(&self, path: &Path<Self::Ref, D>) -> String {
        let mut out: String = String::from("[");
        for (node, side) in path.iter().skip(1) {
            let _ = self.fmt_label(node, &mut out);
            out += match side {
                Side::Left => " -left-> ",
                Side::Right => " -right-> ",
                Side::Match => "",
            };
        }
        out.push(']');
        out
    }

    fn debug_print(&self, guard: Self::Ref) {
        trace!("====== Tree ======\n{}==================", self.debug_string(guard));
    }

    fn debug_print_path<const D: usize>(&self, path: &Path<Self::Ref, D>) {
        trace!("{}", self.path_string(path));
    }

    /// Check every red-black and ordering invariant without recursing.
    fn verify_rb_tree(&self, guard: Self::Ref) -> TreeResult<TreeShape>
    where
        Self: NodeOrd,
    {
        if self.color(guard) != Color::Black {
            return Err(TreeError::GuardNotBlack);
        }

        let mut shape: TreeShape = TreeShape::default();
        let mut expected_black: Option<usize> = None;
        let mut previous: Self::Ref = Self::Ref::NULL;
        let mut path: Path<Self::Ref> = Path::new();
        let mut current: Self::Ref = self.first(&mut path, guard);

        while !current.is_null() {
            let depth: usize = path.depth();
            shape.len += 1;
            shape.height = shape.height.max(depth);

            let left: Self::Ref = self.child(current, Side::Left);
            let right: Self::Ref = self.child(current, Side::Right);
            if self.is_red(current) && (self.is_red(left) || self.is_red(right)) {
                return Err(TreeError::RedChild {
                    node: self.label_string(current),
                });
            }

            if left.is_null() || right.is_null() {
                let black: usize = path
                    .iter()
                    .skip(1)
                    .filter(|(node, _)| self.color(*node) == Color::Black)
                    .count();
                match expected_black {
                    Some(expected) if expected != black => {
                        return Err(TreeError::BlackHeightMismatch {
                            node: self.label_string(current),
                            expected,
                            found: black,
                        });
                    }
                    Some(_) => {}
                    None => expected_black = Some(black),
                }
            }

            if !previous.is_null() && self.cmp_nodes(previous, current) != Ordering::Less {
                return Err(TreeError::OutOfOrder {
                    node: self.label_string(current),
                });
            }
            previous = current;
            current = self.next(&mut path);
        }

        shape.black_height = expected_black.unwrap_or(0);
        Ok(shape)
    }

    #[doc(hidden)]
    fn label_string(&self, node: Self::Ref) -> String {
        let mut out: String = String::new();
        let _ = self.fmt_label(node, &mut out);
        out
    }
}

impl<T: TreeReadOperations + NodeLabel> TreeDebugOperations for T {}
