use crate::arena::{Arena, SENTINEL_SIZE, TAGS_SIZE};

/// Whether a block is currently handed out or available for allocation
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum BlockState {
    Free,
    Allocated,
}

/// A typed view of one block in an arena.
///
/// A block is described by the offset of its header sentinel and the signed sentinel value itself.
/// The descriptor is only a copy of what is stored in the arena; changes become visible to the arena once they are
/// written back with [`Block::write_to`].
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Block {
    offset: usize,
    size: i32,
}

impl Block {
    /// Describe a free block with `payload_len` bytes of payload whose header lies at `offset`.
    pub fn free(offset: usize, payload_len: usize) -> Self {
        Self {
            offset,
            size: payload_len as i32,
        }
    }

    /// Describe an allocated block with `payload_len` bytes of payload whose header lies at `offset`.
    pub fn allocated(offset: usize, payload_len: usize) -> Self {
        Self {
            offset,
            size: -(payload_len as i32),
        }
    }

    /// Read the block whose header sentinel lies at `offset`.
    pub fn read_at<const N: usize>(arena: &Arena<N>, offset: usize) -> Self {
        Self {
            offset,
            size: arena.word(offset),
        }
    }

    /// Read the block whose footer sentinel lies at `footer_offset`.
    pub fn read_ending_at<const N: usize>(arena: &Arena<N>, footer_offset: usize) -> Self {
        let size = arena.word(footer_offset);
        Self {
            offset: footer_offset - size.unsigned_abs() as usize - SENTINEL_SIZE,
            size,
        }
    }

    /// Write the header and the footer sentinel of this block into the arena.
    pub fn write_to<const N: usize>(&self, arena: &mut Arena<N>) {
        arena.set_word(self.offset, self.size);
        arena.set_word(self.footer_offset(), self.size);
    }

    /// Offset of the header sentinel.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The raw signed sentinel value.
    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn state(&self) -> BlockState {
        if self.size > 0 {
            BlockState::Free
        } else {
            BlockState::Allocated
        }
    }

    pub fn is_free(&self) -> bool {
        self.state() == BlockState::Free
    }

    /// Number of bytes between the header and the footer sentinel.
    pub fn payload_len(&self) -> usize {
        self.size.unsigned_abs() as usize
    }

    /// Offset of the first payload byte.
    pub fn payload_offset(&self) -> usize {
        self.offset + SENTINEL_SIZE
    }

    /// Offset of the footer sentinel.
    pub fn footer_offset(&self) -> usize {
        self.payload_offset() + self.payload_len()
    }

    /// Offset one past the footer sentinel, i.e. the header of the following block.
    pub fn end(&self) -> usize {
        self.offset + self.payload_len() + TAGS_SIZE
    }
}
