use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use std::cmp::Ordering;
use std::fmt::Display;
use std::mem::size_of;

use crate::{
    fits, get_helper, get_mut_helper, trace, Color, DataIndex, Get, KeyCompare, NodeLabel,
    NodeOrd, NodeRead, NodeWrite, Path, PodBool, Side, TreeDebugOperations, TreeError,
    TreeReadOperations, TreeResult, TreeShape, TreeWriteOperations, NIL,
};

pub const RBTREE_OVERHEAD_BYTES: usize = 16;

pub trait Payload: Zeroable + Pod + PartialOrd + Ord + PartialEq + Eq + Display {}
impl<T: Zeroable + Pod + PartialOrd + Ord + PartialEq + Eq + Display> Payload for T {}

// Overview of the structs and traits in this file.
//
// Public
//  struct RedBlackTree<'a, V: Payload>
//    fn new(data: &'a mut [u8], guard_index: DataIndex) -> Self
//    fn create(data: &'a mut [u8], guard_index: DataIndex) -> Self
//    fn insert(&mut self, index: DataIndex, value: V) -> TreeResult<()>
//    fn remove_by_value(&mut self, value: &V) -> DataIndex
//    fn remove_by_index(&mut self, index: DataIndex)
//  struct RedBlackTreeReadOnly<'a, V: Payload>
//    fn new(data: &'a [u8], guard_index: DataIndex) -> Self
//
//  trait GetRedBlackTreeReadOnlyData
//    NodeRead, KeyCompare<Value>, NodeOrd, NodeLabel
//    RedBlackTreeReadOperations
//  trait GetRedBlackTreeData
//    NodeWrite
//  struct RBNode<V>
//
// Rebalancing lives in the generic engine; this file only maps the node
// capability contract onto records inside a byte slice. Nodes carry no
// parent link.

/// A Red-Black tree whose nodes live at byte offsets inside an unowned byte
/// array. The guard is a node slot in the same array.
pub struct RedBlackTree<'a, V: Payload> {
    /// The address within data of the guard node. Its left child is the root.
    guard_index: DataIndex,
    /// Unowned byte array which contains all the data for this tree and possibly more.
    data: &'a mut [u8],

    phantom: std::marker::PhantomData<&'a V>,
}

/// Same tree, for callers holding only a shared borrow of the data.
pub struct RedBlackTreeReadOnly<'a, V: Payload> {
    guard_index: DataIndex,
    data: &'a [u8],

    phantom: std::marker::PhantomData<&'a V>,
}

impl<'a, V: Payload> RedBlackTreeReadOnly<'a, V> {
    /// Assumes the data is already a well formed tree hanging off the guard.
    pub fn new(data: &'a [u8], guard_index: DataIndex) -> Self {
        let () = RBNode::<V>::NO_TRAILING_PADDING;
        RedBlackTreeReadOnly::<V> {
            guard_index,
            data,
            phantom: std::marker::PhantomData,
        }
    }
}

pub trait GetRedBlackTreeReadOnlyData {
    type Value: Payload;
    fn data(&self) -> &[u8];
    fn guard_index(&self) -> DataIndex;
}

pub trait GetRedBlackTreeData: GetRedBlackTreeReadOnlyData {
    fn data_mut(&mut self) -> &mut [u8];
}

impl<'a, V: Payload> GetRedBlackTreeReadOnlyData for RedBlackTreeReadOnly<'a, V> {
    type Value = V;
    fn data(&self) -> &[u8] {
        self.data
    }
    fn guard_index(&self) -> DataIndex {
        self.guard_index
    }
}

impl<'a, V: Payload> GetRedBlackTreeReadOnlyData for RedBlackTree<'a, V> {
    type Value = V;
    fn data(&self) -> &[u8] {
        self.data
    }
    fn guard_index(&self) -> DataIndex {
        self.guard_index
    }
}

impl<'a, V: Payload> GetRedBlackTreeData for RedBlackTree<'a, V> {
    fn data_mut(&mut self) -> &mut [u8] {
        self.data
    }
}

impl<T: GetRedBlackTreeReadOnlyData> NodeRead for T {
    type Ref = DataIndex;

    fn child(&self, node: DataIndex, side: Side) -> DataIndex {
        debug_assert_ne!(node, NIL);
        let node: &RBNode<T::Value> = get_helper::<RBNode<T::Value>>(self.data(), node);
        match side {
            Side::Left => node.left,
            Side::Right => node.right,
            Side::Match => unreachable!(),
        }
    }

    fn color(&self, node: DataIndex) -> Color {
        debug_assert_ne!(node, NIL);
        get_helper::<RBNode<T::Value>>(self.data(), node).get_color()
    }
}

impl<T: GetRedBlackTreeData> NodeWrite for T {
    fn set_child(&mut self, node: DataIndex, side: Side, child: DataIndex) {
        debug_assert_ne!(node, NIL);
        let node: &mut RBNode<T::Value> =
            get_mut_helper::<RBNode<T::Value>>(self.data_mut(), node);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
            Side::Match => unreachable!(),
        }
    }

    fn set_color(&mut self, node: DataIndex, color: Color) {
        debug_assert_ne!(node, NIL);
        let node: &mut RBNode<T::Value> =
            get_mut_helper::<RBNode<T::Value>>(self.data_mut(), node);
        node.color = PodBool::from(color == Color::Red);
    }
}

impl<T: GetRedBlackTreeReadOnlyData> KeyCompare<T::Value> for T {
    fn compare(&self, key: &T::Value, node: DataIndex) -> Ordering {
        key.cmp(&get_helper::<RBNode<T::Value>>(self.data(), node).value)
    }
}

impl<T: GetRedBlackTreeReadOnlyData> NodeOrd for T {
    fn cmp_nodes(&self, a: DataIndex, b: DataIndex) -> Ordering {
        self.compare(&get_helper::<RBNode<T::Value>>(self.data(), a).value, b)
    }
}

impl<T: GetRedBlackTreeReadOnlyData> NodeLabel for T {
    fn fmt_label(&self, node: DataIndex, out: &mut dyn std::fmt::Write) -> std::fmt::Result {
        let node_data: &RBNode<T::Value> = get_helper::<RBNode<T::Value>>(self.data(), node);
        write!(out, "{node}:{node_data}")
    }
}

pub trait RedBlackTreeReadOperations: GetRedBlackTreeReadOnlyData + Sized {
    fn get_node(&self, index: DataIndex) -> &RBNode<Self::Value> {
        debug_assert_ne!(index, NIL);
        get_helper::<RBNode<Self::Value>>(self.data(), index)
    }

    fn get_value(&self, index: DataIndex) -> &Self::Value {
        &self.get_node(index).value
    }

    fn get_root_index(&self) -> DataIndex {
        self.root(self.guard_index())
    }

    /// Lookup the index of a given value. NIL if absent.
    fn lookup_index(&self, value: &Self::Value) -> DataIndex {
        let mut path: Path<DataIndex> = Path::new();
        if self.search(&mut path, self.guard_index(), value).is_found() {
            path.current()
        } else {
            NIL
        }
    }

    fn get_min_index(&self) -> DataIndex {
        let mut path: Path<DataIndex> = Path::new();
        self.first(&mut path, self.guard_index())
    }

    fn get_max_index(&self) -> DataIndex {
        let mut path: Path<DataIndex> = Path::new();
        self.last(&mut path, self.guard_index())
    }

    fn len(&self) -> usize {
        self.iter().count()
    }

    fn is_empty(&self) -> bool {
        self.get_root_index() == NIL
    }

    /// Ascending iterator over (index, value).
    fn iter(&self) -> RedBlackTreeIterator<'_, Self> {
        let mut path: Path<DataIndex> = Path::new();
        let index: DataIndex = self.first(&mut path, self.guard_index());
        RedBlackTreeIterator {
            tree: self,
            path,
            index,
            side: Side::Right,
        }
    }

    /// Descending iterator over (index, value).
    fn iter_rev(&self) -> RedBlackTreeIterator<'_, Self> {
        let mut path: Path<DataIndex> = Path::new();
        let index: DataIndex = self.last(&mut path, self.guard_index());
        RedBlackTreeIterator {
            tree: self,
            path,
            index,
            side: Side::Left,
        }
    }

    /// Ascending iterator over values in `[min, max]`.
    fn range(&self, min: &Self::Value, max: &Self::Value) -> RedBlackTreeRangeIterator<'_, Self> {
        let mut path: Path<DataIndex> = Path::new();
        let index: DataIndex = self.seek(&mut path, self.guard_index(), min);
        RedBlackTreeRangeIterator {
            tree: self,
            path,
            index,
            max: *max,
        }
    }

    fn verify(&self) -> TreeResult<TreeShape> {
        self.verify_rb_tree(self.guard_index())
    }
}

impl<T: GetRedBlackTreeReadOnlyData> RedBlackTreeReadOperations for T {}

pub struct RedBlackTreeIterator<'t, T: GetRedBlackTreeReadOnlyData> {
    tree: &'t T,
    path: Path<DataIndex>,
    index: DataIndex,
    side: Side,
}

impl<'t, T: RedBlackTreeReadOperations> Iterator for RedBlackTreeIterator<'t, T> {
    type Item = (DataIndex, &'t T::Value);

    fn next(&mut self) -> Option<Self::Item> {
        let index: DataIndex = self.index;
        if index == NIL {
            return None;
        }
        self.index = self.tree.step(&mut self.path, self.side);
        Some((index, self.tree.get_value(index)))
    }
}

pub struct RedBlackTreeRangeIterator<'t, T: GetRedBlackTreeReadOnlyData> {
    tree: &'t T,
    path: Path<DataIndex>,
    index: DataIndex,
    max: T::Value,
}

impl<'t, T: RedBlackTreeReadOperations> Iterator for RedBlackTreeRangeIterator<'t, T> {
    type Item = (DataIndex, &'t T::Value);

    fn next(&mut self) -> Option<Self::Item> {
        let index: DataIndex = self.index;
        if index == NIL {
            return None;
        }
        let value: &'t T::Value = self.tree.get_value(index);
        if *value > self.max {
            self.index = NIL;
            return None;
        }
        self.index = TreeReadOperations::next(self.tree, &mut self.path);
        Some((index, value))
    }
}

impl<'a, V: Payload> RedBlackTree<'a, V> {
    /// Creates a new RedBlackTree. Does not mutate data yet. Assumes the actual
    /// data in data is already well formed as a red black tree.
    pub fn new(data: &'a mut [u8], guard_index: DataIndex) -> Self {
        let () = RBNode::<V>::NO_TRAILING_PADDING;
        RedBlackTree::<V> {
            guard_index,
            data,
            phantom: std::marker::PhantomData,
        }
    }

    /// Creates an empty tree, writing a fresh guard at guard_index.
    pub fn create(data: &'a mut [u8], guard_index: DataIndex) -> Self {
        debug_assert!(fits::<RBNode<V>>(data, guard_index));
        let mut tree: RedBlackTree<'a, V> = RedBlackTree::new(data, guard_index);
        *get_mut_helper::<RBNode<V>>(tree.data, guard_index) = RBNode::zeroed();
        tree.init(guard_index);
        tree
    }

    /// Bytes taken by one node slot.
    pub const fn block_width() -> usize {
        size_of::<RBNode<V>>()
    }

    /// Write value into the slot at index and link it. The slot does not
    /// need to be zeroed.
    pub fn insert(&mut self, index: DataIndex, value: V) -> TreeResult<()> {
        trace!("TREE insert {index}");
        if !fits::<RBNode<V>>(self.data, index) {
            return Err(TreeError::IndexOutOfBounds(index));
        }
        debug_assert_ne!(index, self.guard_index);

        let mut path: Path<DataIndex> = Path::new();
        if self.search(&mut path, self.guard_index, &value).is_found() {
            return Err(TreeError::DuplicateKey {
                existing: path.current(),
            });
        }

        *get_mut_helper::<RBNode<V>>(self.data, index) = RBNode {
            left: NIL,
            right: NIL,
            color: PodBool::from(true),
            payload_type: 0,
            _unused_padding: [0; 6],
            value,
        };
        TreeWriteOperations::insert(self, &path, index);
        Ok(())
    }

    /// Unlink the node holding value. Returns its index so the slot can be
    /// released, or NIL when the value is absent.
    pub fn remove_by_value(&mut self, value: &V) -> DataIndex {
        let mut path: Path<DataIndex> = Path::new();
        if !self.search(&mut path, self.guard_index, value).is_found() {
            return NIL;
        }
        self.delete(&mut path)
    }

    /// Unlink the node at index. Silently ignores NIL.
    pub fn remove_by_index(&mut self, index: DataIndex) {
        trace!("TREE remove {index}");
        if index == NIL {
            return;
        }
        let value: V = *self.get_value(index);
        let removed: DataIndex = self.remove_by_value(&value);
        debug_assert_eq!(removed, index);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Zeroable)]
/// Node in a RedBlack tree. The first 16 bytes are used for maintaining the
/// RedBlack and BST properties, the rest is the payload.
pub struct RBNode<V> {
    pub(crate) left: DataIndex,
    pub(crate) right: DataIndex,
    pub(crate) color: PodBool,

    // Optional enum controlled by the application to identify the type of node.
    // Defaults to zero.
    pub(crate) payload_type: u8,

    pub(crate) _unused_padding: [u8; 6],
    pub(crate) value: V,
}
unsafe impl<V: Payload> Pod for RBNode<V> {}
impl<V: Payload> Get for RBNode<V> {}

const_assert_eq!(size_of::<RBNode<u64>>(), RBTREE_OVERHEAD_BYTES + 8);
const_assert_eq!(size_of::<RBNode<[u64; 4]>>(), RBTREE_OVERHEAD_BYTES + 32);

impl<V: Payload> Display for RBNode<V> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.value)
    }
}

impl<V: Payload> RBNode<V> {
    // Pod needs every byte to be a field. A payload whose size is not a
    // multiple of 4 would leave padding after it.
    const NO_TRAILING_PADDING: () = assert!(
        size_of::<RBNode<V>>() == RBTREE_OVERHEAD_BYTES + size_of::<V>(),
        "payload size must be a multiple of 4"
    );

    pub fn get_left_index(&self) -> DataIndex {
        self.left
    }
    pub fn get_right_index(&self) -> DataIndex {
        self.right
    }
    pub fn get_color(&self) -> Color {
        if self.color.get() {
            Color::Red
        } else {
            Color::Black
        }
    }
    pub fn get_payload_type(&self) -> u8 {
        self.payload_type
    }
    pub fn set_payload_type(&mut self, payload_type: u8) {
        self.payload_type = payload_type;
    }
    /// Changing the ordering of the value breaks the tree.
    pub fn get_mut_value(&mut self) -> &mut V {
        &mut self.value
    }
    pub fn get_value(&self) -> &V {
        &self.value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Copy, Clone, Pod, Zeroable, Debug)]
    #[repr(C)]
    struct TestOrderBid {
        order_id: u64,
        padding: [u8; 128],
    }

    impl Ord for TestOrderBid {
        fn cmp(&self, other: &Self) -> Ordering {
            (self.order_id).cmp(&(other.order_id))
        }
    }

    impl PartialOrd for TestOrderBid {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl PartialEq for TestOrderBid {
        fn eq(&self, other: &Self) -> bool {
            (self.order_id) == (other.order_id)
        }
    }

    impl Eq for TestOrderBid {}

    impl Display for TestOrderBid {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "{}", self.order_id)
        }
    }

    impl TestOrderBid {
        fn new(order_id: u64) -> Self {
            TestOrderBid {
                order_id,
                padding: [0; 128],
            }
        }
    }

    const TEST_BLOCK_WIDTH: DataIndex = (RBTREE_OVERHEAD_BYTES + 136) as DataIndex;
    const GUARD: DataIndex = 0;

    // Backing store aligned for u64 payloads.
    fn aligned_data(len: usize) -> Vec<u64> {
        vec![0; len / 8]
    }

    fn order_ids<T: RedBlackTreeReadOperations<Value = TestOrderBid>>(tree: &T) -> Vec<u64> {
        tree.iter().map(|(_, order)| order.order_id).collect()
    }

    fn init_simple_tree(data: &mut [u8]) -> RedBlackTree<TestOrderBid> {
        let mut tree: RedBlackTree<TestOrderBid> = RedBlackTree::create(data, GUARD);

        for i in 1..12 {
            tree.insert(TEST_BLOCK_WIDTH * i, TestOrderBid::new((i * 1_000).into()))
                .unwrap();
        }
        tree
    }

    #[test]
    fn test_block_width() {
        assert_eq!(
            RedBlackTree::<TestOrderBid>::block_width(),
            TEST_BLOCK_WIDTH as usize
        );
    }

    #[test]
    fn test_node_layout_has_no_padding() {
        let () = RBNode::<u32>::NO_TRAILING_PADDING;
        let () = RBNode::<TestOrderBid>::NO_TRAILING_PADDING;
        assert_eq!(size_of::<RBNode<u32>>(), RBTREE_OVERHEAD_BYTES + 4);

        // Smallest accepted payload still round trips through the arena.
        let mut buffer: Vec<u64> = aligned_data(1_000);
        let mut tree: RedBlackTree<u32> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        let width: DataIndex = RedBlackTree::<u32>::block_width() as DataIndex;
        for i in 1..10 {
            tree.insert(width * i, 100 - i).unwrap();
        }
        assert_eq!(*tree.get_value(tree.get_min_index()), 91);
        assert_eq!(tree.verify().unwrap().len, 9);
    }

    #[test]
    fn test_insert_basic() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);

        tree.insert(TEST_BLOCK_WIDTH, TestOrderBid::new(1111)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 2, TestOrderBid::new(1234)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 3, TestOrderBid::new(1000)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 4, TestOrderBid::new(2000)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 5, TestOrderBid::new(3000)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 6, TestOrderBid::new(4000)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 7, TestOrderBid::new(5000)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 8, TestOrderBid::new(6000)).unwrap();

        assert_eq!(
            order_ids(&tree),
            vec![1000, 1111, 1234, 2000, 3000, 4000, 5000, 6000]
        );
        assert_eq!(tree.verify().unwrap().len, 8);
    }

    #[test]
    fn test_debug_print() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        tree.debug_print(GUARD);

        let dump: String = tree.debug_string(GUARD);
        assert_eq!(dump.lines().count(), 11);
        // Largest key is printed first.
        assert!(dump.lines().next().unwrap().ends_with(":11000"));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        assert_eq!(
            tree.insert(TEST_BLOCK_WIDTH * 20, TestOrderBid::new(4000)),
            Err(TreeError::DuplicateKey {
                existing: TEST_BLOCK_WIDTH * 4
            })
        );
        assert_eq!(tree.len(), 11);
        tree.verify().unwrap();
    }

    #[test]
    fn test_insert_out_of_bounds() {
        let mut buffer: Vec<u64> = aligned_data(1_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        assert_eq!(
            tree.insert(TEST_BLOCK_WIDTH * 7, TestOrderBid::new(1)),
            Err(TreeError::IndexOutOfBounds(TEST_BLOCK_WIDTH * 7))
        );
        assert_eq!(
            tree.insert(NIL, TestOrderBid::new(1)),
            Err(TreeError::IndexOutOfBounds(NIL))
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_fix() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));

        // Should go left and right through the tree
        tree.insert(TEST_BLOCK_WIDTH * 32, TestOrderBid::new(15_900))
            .unwrap();
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_fix() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));

        for i in 1..12 {
            assert_eq!(
                tree.remove_by_value(&TestOrderBid::new(i * 1_000)),
                TEST_BLOCK_WIDTH * i as DataIndex
            );
            tree.verify().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.get_min_index(), NIL);
    }

    #[test]
    fn test_remove_fix_internal_successor_is_left() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        tree.remove_by_value(&TestOrderBid::new(7 * 1_000));
        tree.verify().unwrap();
        assert_eq!(
            order_ids(&tree),
            vec![1000, 2000, 3000, 4000, 5000, 6000, 8000, 9000, 10000, 11000]
        );
    }

    #[test]
    fn test_remove_fix_internal_successor_is_right_child() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        tree.remove_by_value(&TestOrderBid::new(2 * 1_000));
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_only_has_right_after_swap() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        tree.remove_by_value(&TestOrderBid::new(5 * 1_000));
        tree.remove_by_value(&TestOrderBid::new(4 * 1_000));
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_only_has_left_after_swap() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        tree.remove_by_value(&TestOrderBid::new(11 * 1_000));
        tree.remove_by_value(&TestOrderBid::new(10 * 1_000));
        tree.verify().unwrap();
    }

    #[test]
    fn test_internal_remove_keeps_node_identity() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));

        for i in 4..8 {
            tree.remove_by_value(&TestOrderBid::new(i * 1_000));
            tree.verify().unwrap();
        }
        // Every surviving value is still in the slot it was written to.
        for (index, order) in tree.iter() {
            assert_eq!(index as u64 / TEST_BLOCK_WIDTH as u64 * 1_000, order.order_id);
        }
    }

    #[test]
    fn test_rotate_right() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);

        for i in 1..12 {
            tree.insert(
                TEST_BLOCK_WIDTH * i,
                TestOrderBid::new(((12 - i) * 1_000).into()),
            )
            .unwrap();
        }
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_nil() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        // Does not exist in the tree. Should fail silently.
        assert_eq!(tree.remove_by_value(&TestOrderBid::new(99999)), NIL);
        assert_eq!(tree.remove_by_value(&TestOrderBid::new(1)), NIL);
        tree.remove_by_index(NIL);
        tree.verify().unwrap();
        assert_eq!(tree.len(), 11);
    }

    #[test]
    fn test_min_max() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        assert_eq!(tree.get_max_index(), TEST_BLOCK_WIDTH * 11);
        assert_eq!(tree.get_min_index(), TEST_BLOCK_WIDTH);
    }

    #[test]
    fn test_empty() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        assert_eq!(tree.get_max_index(), NIL);
        assert_eq!(tree.get_min_index(), NIL);
        assert_eq!(tree.iter().count(), 0);
        assert_eq!(tree.verify().unwrap(), TreeShape::default());
    }

    #[test]
    fn test_insert_right_left() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        tree.insert(TEST_BLOCK_WIDTH, TestOrderBid::new(100)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 2, TestOrderBid::new(200)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 3, TestOrderBid::new(300)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 4, TestOrderBid::new(150)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 5, TestOrderBid::new(125)).unwrap();
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_left_left() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        tree.insert(TEST_BLOCK_WIDTH * 5, TestOrderBid::new(40)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 4, TestOrderBid::new(30)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 3, TestOrderBid::new(25)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 2, TestOrderBid::new(20)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH, TestOrderBid::new(15)).unwrap();

        tree.remove_by_value(&TestOrderBid::new(40));
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_right_left() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        tree.insert(TEST_BLOCK_WIDTH, TestOrderBid::new(20)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 2, TestOrderBid::new(30)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 3, TestOrderBid::new(40)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 4, TestOrderBid::new(35)).unwrap();

        tree.remove_by_value(&TestOrderBid::new(20));
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_left_right() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        tree.insert(TEST_BLOCK_WIDTH, TestOrderBid::new(20)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 2, TestOrderBid::new(30)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 3, TestOrderBid::new(40)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 4, TestOrderBid::new(25)).unwrap();

        tree.remove_by_value(&TestOrderBid::new(40));
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_red_left_sibling() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        tree.insert(TEST_BLOCK_WIDTH, TestOrderBid::new(30)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 2, TestOrderBid::new(20)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 4, TestOrderBid::new(15)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 3, TestOrderBid::new(10)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 5, TestOrderBid::new(5)).unwrap();

        tree.insert(TEST_BLOCK_WIDTH * 6, TestOrderBid::new(1)).unwrap();
        tree.remove_by_value(&TestOrderBid::new(1));
        tree.remove_by_value(&TestOrderBid::new(30));
        tree.verify().unwrap();
        assert_eq!(order_ids(&tree), vec![5, 10, 15, 20]);
    }

    #[test]
    fn test_remove_red_right_sibling() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);
        tree.insert(TEST_BLOCK_WIDTH, TestOrderBid::new(10)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 2, TestOrderBid::new(20)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 4, TestOrderBid::new(25)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 3, TestOrderBid::new(30)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 5, TestOrderBid::new(35)).unwrap();

        tree.insert(TEST_BLOCK_WIDTH * 6, TestOrderBid::new(45)).unwrap();
        tree.remove_by_value(&TestOrderBid::new(45));
        tree.remove_by_value(&TestOrderBid::new(10));
        tree.verify().unwrap();
        assert_eq!(order_ids(&tree), vec![20, 25, 30, 35]);
    }

    #[test]
    fn test_insert_and_remove_complex() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> =
            RedBlackTree::create(bytemuck::cast_slice_mut(&mut buffer), GUARD);

        tree.insert(TEST_BLOCK_WIDTH, TestOrderBid::new(0)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 2, TestOrderBid::new(1064)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 3, TestOrderBid::new(4128)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 4, TestOrderBid::new(2192)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 5, TestOrderBid::new(5256)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 6, TestOrderBid::new(3320)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 7, TestOrderBid::new(8384)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 8, TestOrderBid::new(7448)).unwrap();
        tree.insert(TEST_BLOCK_WIDTH * 9, TestOrderBid::new(6512)).unwrap();
        tree.remove_by_index(TEST_BLOCK_WIDTH * 7);
        tree.remove_by_index(TEST_BLOCK_WIDTH * 8);
        tree.remove_by_index(TEST_BLOCK_WIDTH * 9);
        tree.remove_by_index(TEST_BLOCK_WIDTH * 5);
        tree.remove_by_index(TEST_BLOCK_WIDTH * 3);

        tree.verify().unwrap();
        assert_eq!(order_ids(&tree), vec![0, 1064, 2192, 3320]);
    }

    #[test]
    fn test_lookup_index() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        assert_eq!(tree.lookup_index(&TestOrderBid::new(6_000)), TEST_BLOCK_WIDTH * 6);
        assert_eq!(tree.lookup_index(&TestOrderBid::new(6_001)), NIL);
        assert_eq!(tree.get_value(TEST_BLOCK_WIDTH * 3).order_id, 3_000);
    }

    #[test]
    fn test_iter_rev() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        let descending: Vec<u64> = tree.iter_rev().map(|(_, order)| order.order_id).collect();
        assert_eq!(descending, (1..12).rev().map(|i| i * 1_000).collect::<Vec<u64>>());
    }

    #[test]
    fn test_range_query() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));

        let results: Vec<u64> = tree
            .range(&TestOrderBid::new(2_000), &TestOrderBid::new(4_000))
            .map(|(_, order)| order.order_id)
            .collect();
        assert_eq!(results, vec![2_000, 3_000, 4_000]);

        // Bounds need not be present.
        let results: Vec<u64> = tree
            .range(&TestOrderBid::new(2_500), &TestOrderBid::new(5_500))
            .map(|(_, order)| order.order_id)
            .collect();
        assert_eq!(results, vec![3_000, 4_000, 5_000]);

        assert_eq!(
            tree.range(&TestOrderBid::new(11_001), &TestOrderBid::new(20_000))
                .count(),
            0
        );
        assert_eq!(
            tree.range(&TestOrderBid::new(0), &TestOrderBid::new(999)).count(),
            0
        );
    }

    #[test]
    fn test_payload_type() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let mut tree: RedBlackTree<TestOrderBid> = init_simple_tree(bytemuck::cast_slice_mut(&mut buffer));
        get_mut_helper::<RBNode<TestOrderBid>>(tree.data_mut(), TEST_BLOCK_WIDTH * 2)
            .set_payload_type(7);
        tree.remove_by_value(&TestOrderBid::new(1_000));
        tree.verify().unwrap();
        assert_eq!(tree.get_node(TEST_BLOCK_WIDTH * 2).get_payload_type(), 7);
    }

    #[test]
    fn test_read_only() {
        let mut buffer: Vec<u64> = aligned_data(100_000);
        let data: &mut [u8] = bytemuck::cast_slice_mut(&mut buffer);
        let root_index: DataIndex = {
            let tree: RedBlackTree<TestOrderBid> = init_simple_tree(data);
            tree.get_root_index()
        };

        let tree: RedBlackTreeReadOnly<TestOrderBid> = RedBlackTreeReadOnly::new(data, GUARD);
        assert_eq!(tree.get_root_index(), root_index);
        assert_eq!(tree.len(), 11);
        assert_eq!(tree.lookup_index(&TestOrderBid::new(9_000)), TEST_BLOCK_WIDTH * 9);
        assert_eq!(tree.verify().unwrap().len, 11);
    }
}
