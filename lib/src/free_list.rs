use std::mem::size_of;

use crate::{fits, get_mut_helper, DataIndex, Get, NIL};

// FreeList is a linked list threaded through unused node slots of an arena,
// so tree nodes can be recycled without an allocator. A free slot is zeroed
// except for its first four bytes, which hold the next free index.
pub struct FreeList<'a, T: Get> {
    /// Index in data of the head of the free list.
    head_index: DataIndex,
    /// Mutable data array of bytes in which the free list lives.
    data: &'a mut [u8],

    /// Placeholder for holding the slot type.
    phantom: std::marker::PhantomData<&'a T>,
}

impl<'a, T: Get> FreeList<'a, T> {
    /// Create a new free list. Assumes that the data within data is already a well
    /// formed FreeList. Use NIL as head_index for an empty one.
    pub fn new(data: &'a mut [u8], head_index: DataIndex) -> Self {
        debug_assert!(size_of::<T>() >= size_of::<DataIndex>());
        FreeList {
            head_index,
            data,
            phantom: std::marker::PhantomData,
        }
    }

    /// Gets the index of head.
    pub fn get_head(&self) -> DataIndex {
        self.head_index
    }

    pub fn is_empty(&self) -> bool {
        self.head_index == NIL
    }

    /// Free a node to the free list
    pub fn add(&mut self, index: DataIndex) {
        debug_assert!(fits::<T>(self.data, index));
        *get_mut_helper::<T>(self.data, index) = T::zeroed();
        self.write_next(index, self.head_index);
        self.head_index = index;
    }

    /// Take the slot at the head. NIL when nothing is free.
    pub fn remove(&mut self) -> DataIndex {
        if self.head_index == NIL {
            return NIL;
        }

        let free_node_index: DataIndex = self.head_index;
        self.head_index = self.read_next(free_node_index);

        // Rest of the slot was zeroed when it was added.
        self.write_next(free_node_index, 0);

        free_node_index
    }

    /// Free `count` consecutive slots starting at `start`. The lowest index
    /// ends up at the head.
    pub fn extend(&mut self, start: DataIndex, count: u32) {
        let width: DataIndex = size_of::<T>() as DataIndex;
        for i in (0..count).rev() {
            self.add(start + i * width);
        }
    }

    fn read_next(&self, index: DataIndex) -> DataIndex {
        let start: usize = index as usize;
        bytemuck::pod_read_unaligned(&self.data[start..start + size_of::<DataIndex>()])
    }

    fn write_next(&mut self, index: DataIndex, next: DataIndex) {
        let start: usize = index as usize;
        self.data[start..start + size_of::<DataIndex>()].copy_from_slice(bytemuck::bytes_of(&next));
    }
}
