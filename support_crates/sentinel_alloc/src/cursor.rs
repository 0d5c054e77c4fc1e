//! Cursors that walk the blocks of an arena in address order.
//!
//! A cursor only knows its arena and a byte offset.
//! Stepping forward skips the header, the payload and the footer of the current block; stepping backward reads the
//! footer of the previous block which sits directly in front of the current header.

use crate::arena::{Arena, SENTINEL_SIZE, TAGS_SIZE};
use crate::block::Block;
use core::fmt::{Debug, Formatter};
use core::ptr;

/// Offset of the next block's header when the current block's header holds `sentinel`.
fn next_offset(offset: usize, sentinel: i32) -> usize {
    offset + sentinel.unsigned_abs() as usize + TAGS_SIZE
}

/// Offset of the previous block's header, derived from the footer that precedes `offset`.
fn prev_offset<const N: usize>(arena: &Arena<N>, offset: usize) -> usize {
    let prev_footer = arena.word(offset - SENTINEL_SIZE);
    offset - prev_footer.unsigned_abs() as usize - TAGS_SIZE
}

/// A read-only position in an arena that denotes the block whose header lies at that position.
///
/// The cursor at offset `N` is the end position; it must not be dereferenced or advanced.
#[derive(Copy, Clone)]
pub struct BlockCursor<'a, const N: usize> {
    arena: &'a Arena<N>,
    offset: usize,
}

impl<'a, const N: usize> BlockCursor<'a, N> {
    pub fn new(arena: &'a Arena<N>, offset: usize) -> Self {
        Self { arena, offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_end(&self) -> bool {
        self.offset == N
    }

    /// The header sentinel of the denoted block.
    pub fn get(&self) -> i32 {
        debug_assert!(!self.is_end(), "the end cursor cannot be dereferenced");
        self.arena.word(self.offset)
    }

    /// A descriptor of the denoted block.
    pub fn block(&self) -> Block {
        debug_assert!(!self.is_end(), "the end cursor cannot be dereferenced");
        Block::read_at(self.arena, self.offset)
    }

    /// Move to the header of the following block.
    pub fn advance(&mut self) {
        debug_assert!(!self.is_end(), "cannot advance past the end cursor");
        self.offset = next_offset(self.offset, self.get());
    }

    /// Move to the header of the preceding block.
    pub fn retreat(&mut self) {
        debug_assert!(self.offset > 0, "cannot retreat past the first block");
        self.offset = prev_offset(self.arena, self.offset);
    }
}

impl<const N: usize> PartialEq for BlockCursor<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.arena, other.arena) && self.offset == other.offset
    }
}

impl<const N: usize> Eq for BlockCursor<'_, N> {}

impl<const N: usize> Debug for BlockCursor<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockCursor")
            .field("arena", &ptr::addr_of!(*self.arena))
            .field("offset", &self.offset)
            .finish()
    }
}

/// A position in an arena through which the header sentinel of the denoted block can be overwritten.
///
/// Traversal works exactly like [`BlockCursor`].
/// Writing through this cursor only touches the header; keeping the footer in sync is up to the caller.
pub struct BlockCursorMut<'a, const N: usize> {
    arena: &'a mut Arena<N>,
    offset: usize,
}

impl<'a, const N: usize> BlockCursorMut<'a, N> {
    pub fn new(arena: &'a mut Arena<N>, offset: usize) -> Self {
        Self { arena, offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_end(&self) -> bool {
        self.offset == N
    }

    /// The header sentinel of the denoted block.
    pub fn get(&self) -> i32 {
        debug_assert!(!self.is_end(), "the end cursor cannot be dereferenced");
        self.arena.word(self.offset)
    }

    /// Overwrite the header sentinel of the denoted block.
    pub fn set(&mut self, sentinel: i32) {
        debug_assert!(!self.is_end(), "the end cursor cannot be dereferenced");
        self.arena.set_word(self.offset, sentinel);
    }

    /// A descriptor of the denoted block.
    pub fn block(&self) -> Block {
        debug_assert!(!self.is_end(), "the end cursor cannot be dereferenced");
        Block::read_at(self.arena, self.offset)
    }

    /// Move to the header of the following block.
    pub fn advance(&mut self) {
        debug_assert!(!self.is_end(), "cannot advance past the end cursor");
        self.offset = next_offset(self.offset, self.get());
    }

    /// Move to the header of the preceding block.
    pub fn retreat(&mut self) {
        debug_assert!(self.offset > 0, "cannot retreat past the first block");
        self.offset = prev_offset(self.arena, self.offset);
    }

    /// Borrow this cursor as a read-only one at the same position.
    pub fn as_cursor(&self) -> BlockCursor<'_, N> {
        BlockCursor::new(self.arena, self.offset)
    }
}

impl<const N: usize> PartialEq for BlockCursorMut<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(&*self.arena, &*other.arena) && self.offset == other.offset
    }
}

impl<const N: usize> Eq for BlockCursorMut<'_, N> {}

impl<const N: usize> Debug for BlockCursorMut<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockCursorMut")
            .field("arena", &ptr::addr_of!(*self.arena))
            .field("offset", &self.offset)
            .finish()
    }
}

/// An iterator over the blocks of an arena, front to back or back to front.
#[derive(Clone, Debug)]
pub struct Blocks<'a, const N: usize> {
    front: BlockCursor<'a, N>,
    back: BlockCursor<'a, N>,
}

impl<'a, const N: usize> Blocks<'a, N> {
    pub(crate) fn new(arena: &'a Arena<N>) -> Self {
        Self {
            front: BlockCursor::new(arena, 0),
            back: BlockCursor::new(arena, N),
        }
    }
}

impl<const N: usize> Iterator for Blocks<'_, N> {
    type Item = Block;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        let block = self.front.block();
        self.front.advance();
        Some(block)
    }
}

impl<const N: usize> DoubleEndedIterator for Blocks<'_, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        self.back.retreat();
        Some(self.back.block())
    }
}
