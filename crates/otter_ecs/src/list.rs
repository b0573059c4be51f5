//! Slot storage for the blocks of one component kind.
//!
//! A [`ComponentList`] is a contiguous array of fixed-size slots plus a
//! [`BitMap`] of which slots are in use. Allocation takes the lowest free
//! slot and grows the array one bitmap word (64 slots) at a time; freeing the
//! highest slots shrinks it again. Slots are backed by `u64` words so every
//! block starts on an 8-byte boundary and typed views are checked casts.

use crate::bitmap::BitMap;
use crate::component::ComponentLayout;

/// Storage for every block of a single component kind.
#[derive(Debug, Clone)]
pub struct ComponentList {
    layout: ComponentLayout,
    /// Words per slot.
    stride: usize,
    used: BitMap,
    data: Vec<u64>,
}

impl ComponentList {
    /// Create an empty list for blocks of the given layout.
    #[must_use]
    pub fn new(layout: ComponentLayout) -> Self {
        Self {
            layout,
            stride: layout.size.div_ceil(std::mem::size_of::<u64>()),
            used: BitMap::new(),
            data: Vec::new(),
        }
    }

    /// The block layout of this list.
    #[must_use]
    pub fn layout(&self) -> ComponentLayout {
        self.layout
    }

    /// Number of allocated slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.used.count_ones()
    }

    /// Returns `true` if no slot is allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots backed by memory, used or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.used.capacity()
    }

    /// Slot usage bitmap.
    #[must_use]
    pub fn used(&self) -> &BitMap {
        &self.used
    }

    /// Allocate the lowest free slot and zero its contents.
    pub fn allocate(&mut self) -> usize {
        let index = self.used.find_first_unset();
        if index >= self.used.capacity() {
            let added = self.used.expand();
            self.data.resize(self.data.len() + added * self.stride, 0);
        }
        self.used.set(index, true);
        let range = self.word_range(index);
        self.data[range].fill(0);
        index
    }

    /// Release a slot. Returns `false` if it was not allocated.
    pub fn deallocate(&mut self, index: usize) -> bool {
        if !self.used.get(index) {
            return false;
        }
        self.used.set(index, false);
        if self.used.compact() > 0 {
            self.data.truncate(self.used.capacity() * self.stride);
        }
        true
    }

    /// The bytes of an allocated slot.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if !self.used.get(index) {
            return None;
        }
        let words = &self.data[self.word_range(index)];
        Some(&bytemuck::cast_slice::<u64, u8>(words)[..self.layout.size])
    }

    /// Mutable bytes of an allocated slot.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if !self.used.get(index) {
            return None;
        }
        let range = self.word_range(index);
        let size = self.layout.size;
        let words = &mut self.data[range];
        Some(&mut bytemuck::cast_slice_mut::<u64, u8>(words)[..size])
    }

    fn word_range(&self, index: usize) -> std::ops::Range<usize> {
        index * self.stride..(index + 1) * self.stride
    }
}
