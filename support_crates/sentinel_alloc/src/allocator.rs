use crate::arena::{Arena, SENTINEL_SIZE, TAGS_SIZE};
use crate::block::Block;
use crate::cursor::{BlockCursor, BlockCursorMut, Blocks};
use crate::element::Element;
use crate::error::AllocError;
use core::cmp::Ordering;
use core::fmt::{Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// The smallest payload a free block that is split off during allocation must be able to hold.
///
/// Leftovers smaller than this stay part of the allocated block instead of becoming a block of their own.
const MIN_FREE_PAYLOAD: usize = TAGS_SIZE;

/// The location of an element inside the arena of a [`SentinelAllocator`].
///
/// Pointers are plain byte offsets into the arena and are ordered by address.
/// The pointer returned from [`SentinelAllocator::allocate`] denotes the first payload byte of the allocated block
/// and is the only one that is accepted by [`SentinelAllocator::deallocate`].
pub struct PayloadPtr<T> {
    offset: usize,
    _element: PhantomData<T>,
}

impl<T> PayloadPtr<T> {
    pub(crate) fn new(offset: usize) -> Self {
        Self {
            offset,
            _element: PhantomData,
        }
    }

    /// The byte offset of the pointed-to element inside the arena.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<T: Element> PayloadPtr<T> {
    /// A pointer to the element `count` places after this one.
    pub fn add(self, count: usize) -> Self {
        Self::new(self.offset + count * T::SIZE)
    }
}

impl<T> Copy for PayloadPtr<T> {}

impl<T> Clone for PayloadPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for PayloadPtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl<T> Eq for PayloadPtr<T> {}

impl<T> PartialOrd for PayloadPtr<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for PayloadPtr<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl<T> Hash for PayloadPtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state)
    }
}

impl<T> Debug for PayloadPtr<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("PayloadPtr").field(&self.offset).finish()
    }
}

/// A first-fit allocator that hands out runs of `T` from an inline arena of `N` bytes.
///
/// All bookkeeping is stored as sentinels inside the arena itself (see the [crate documentation](crate)), so the
/// allocator has no state besides its arena and cloning it copies the complete allocation state.
///
/// After every successful mutation the arena-wide invariant is re-checked in debug builds.
pub struct SentinelAllocator<T: Element, const N: usize> {
    arena: Arena<N>,
    _element: PhantomData<T>,
}

impl<T: Element, const N: usize> SentinelAllocator<T, N> {
    /// The smallest arena that can hold a single block with room for one element.
    pub const MIN_CAPACITY: usize = T::SIZE + TAGS_SIZE;

    /// Create an allocator whose arena is one single free block.
    pub fn new() -> Result<Self, AllocError> {
        assert!(
            N <= i32::MAX as usize,
            "arena is too large to be described by 32-bit sentinels"
        );
        if N < Self::MIN_CAPACITY {
            log::warn!(
                "refusing to create an allocator with {} bytes; at least {} are required",
                N,
                Self::MIN_CAPACITY
            );
            return Err(AllocError::CapacityTooSmall {
                capacity: N,
                minimum: Self::MIN_CAPACITY,
            });
        }

        let mut arena = Arena::new();
        Block::free(0, N - TAGS_SIZE).write_to(&mut arena);
        log::debug!(
            "created allocator with {} bytes of arena and {} byte elements",
            N,
            T::SIZE
        );

        let allocator = Self {
            arena,
            _element: PhantomData,
        };
        debug_assert!(allocator.valid());
        Ok(allocator)
    }

    /// The capacity of the arena in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Reserve room for `count` elements in the first free block that is large enough.
    ///
    /// If the chosen block has enough room left over for another free block, it is split and the allocated part is
    /// sized exactly to the request.
    /// Otherwise the whole block is handed out and its advertised size may exceed the request by the few leftover
    /// bytes.
    pub fn allocate(&mut self, count: usize) -> Result<PayloadPtr<T>, AllocError> {
        let Some(requested) = count.checked_mul(T::SIZE) else {
            log::warn!("allocation of {} elements overflows the address space", count);
            return Err(AllocError::InsufficientMemory {
                requested: usize::MAX,
            });
        };

        let Some(block) = self
            .blocks()
            .find(|block| block.is_free() && block.payload_len() >= requested)
        else {
            log::warn!("no free block can hold {} bytes", requested);
            return Err(AllocError::InsufficientMemory { requested });
        };

        let remaining = block.payload_len() - requested;
        let allocated = if remaining >= TAGS_SIZE + MIN_FREE_PAYLOAD {
            let allocated = Block::allocated(block.offset(), requested);
            let rest = Block::free(allocated.end(), remaining - TAGS_SIZE);
            log::trace!(
                "splitting free block at {} into {} allocated and {} free bytes",
                block.offset(),
                requested,
                rest.payload_len()
            );
            allocated.write_to(&mut self.arena);
            rest.write_to(&mut self.arena);
            allocated
        } else {
            log::trace!(
                "handing out the whole free block at {} ({} bytes for a request of {})",
                block.offset(),
                block.payload_len(),
                requested
            );
            let allocated = Block::allocated(block.offset(), block.payload_len());
            allocated.write_to(&mut self.arena);
            allocated
        };

        debug_assert!(self.valid());
        Ok(PayloadPtr::new(allocated.payload_offset()))
    }

    /// Return the block denoted by `ptr` to the pool of free blocks and merge it with free neighbours.
    ///
    /// `count` is not needed to find the block because its size is stored in its sentinels; it is accepted so that
    /// call sites mirror the corresponding [`allocate`](Self::allocate) call.
    ///
    /// The pointer is rejected without modifying the arena if it lies outside the arena, if it does not denote the
    /// start of a block, or if the block is already free.
    pub fn deallocate(&mut self, ptr: PayloadPtr<T>, count: usize) -> Result<(), AllocError> {
        let block = self.allocated_block(ptr).inspect_err(|e| {
            log::warn!("rejecting deallocation of {:?} ({} elements): {}", ptr, count, e)
        })?;

        // mark the block itself as free
        let mut freed = Block::free(block.offset(), block.payload_len());
        freed.write_to(&mut self.arena);

        // merge with the following block
        if freed.end() < N {
            let next = Block::read_at(&self.arena, freed.end());
            if next.is_free() {
                log::trace!(
                    "coalescing block at {} with following free block at {}",
                    freed.offset(),
                    next.offset()
                );
                freed = Block::free(
                    freed.offset(),
                    freed.payload_len() + next.payload_len() + TAGS_SIZE,
                );
                freed.write_to(&mut self.arena);
            }
        }

        // merge with the preceding block
        if freed.offset() > 0 {
            let prev = Block::read_ending_at(&self.arena, freed.offset() - SENTINEL_SIZE);
            if prev.is_free() {
                log::trace!(
                    "coalescing block at {} with preceding free block at {}",
                    freed.offset(),
                    prev.offset()
                );
                freed = Block::free(
                    prev.offset(),
                    prev.payload_len() + freed.payload_len() + TAGS_SIZE,
                );
                freed.write_to(&mut self.arena);
            }
        }

        debug_assert!(self.valid());
        Ok(())
    }

    /// Initialize the element at `ptr` with `value`.
    ///
    /// This only writes payload bytes; no bookkeeping is changed.
    pub fn construct(&mut self, ptr: PayloadPtr<T>, value: T) {
        value.write_to_chunk(&mut self.arena.bytes_mut()[ptr.offset()..ptr.offset() + T::SIZE]);
        debug_assert!(self.valid());
    }

    /// Tear down the element at `ptr` and hand it back to the caller, which drops it unless it is kept.
    ///
    /// The payload bytes are left as they are; the slot counts as uninitialized afterwards.
    pub fn destroy(&mut self, ptr: PayloadPtr<T>) -> T {
        let value = self.get(ptr);
        debug_assert!(self.valid());
        value
    }

    /// Read the element at `ptr`.
    pub fn get(&self, ptr: PayloadPtr<T>) -> T {
        T::read_from_chunk(&self.arena.bytes()[ptr.offset()..ptr.offset() + T::SIZE])
    }

    /// The payload bytes of the allocated block that starts at `ptr`.
    ///
    /// The slice covers the advertised size of the block which can be larger than what was requested.
    pub fn payload(&self, ptr: PayloadPtr<T>) -> Result<&[u8], AllocError> {
        let block = self.allocated_block(ptr)?;
        Ok(&self.arena.bytes()[block.payload_offset()..block.footer_offset()])
    }

    /// Mutable access to the payload bytes of the allocated block that starts at `ptr`.
    pub fn payload_mut(&mut self, ptr: PayloadPtr<T>) -> Result<&mut [u8], AllocError> {
        let block = self.allocated_block(ptr)?;
        Ok(&mut self.arena.bytes_mut()[block.payload_offset()..block.footer_offset()])
    }

    /// Locate the allocated block whose payload starts at `ptr` without modifying anything.
    fn allocated_block(&self, ptr: PayloadPtr<T>) -> Result<Block, AllocError> {
        let offset = ptr
            .offset()
            .checked_sub(SENTINEL_SIZE)
            .ok_or(AllocError::OutOfBounds {
                offset: ptr.offset(),
            })?;
        if offset + SENTINEL_SIZE > N {
            return Err(AllocError::OutOfBounds { offset });
        }

        // zero-length reservations carry a zero sentinel and are never released
        let block = Block::read_at(&self.arena, offset);
        if block.size() >= 0 {
            return Err(AllocError::NotAllocated { offset });
        }
        if block.end() > N || self.arena.word(block.footer_offset()) != block.size() {
            return Err(AllocError::MalformedBlock { offset });
        }

        Ok(block)
    }

    /// Check that the blocks tile the arena exactly and that every header matches its footer.
    ///
    /// This never panics, even on an arena whose sentinels have been corrupted.
    pub fn valid(&self) -> bool {
        let mut offset = 0;
        while offset < N {
            if offset + SENTINEL_SIZE > N {
                return false;
            }
            let block = Block::read_at(&self.arena, offset);
            if block.end() > N || self.arena.word(block.footer_offset()) != block.size() {
                return false;
            }
            offset = block.end();
        }

        offset == N
    }

    /// Read the sentinel-sized word at byte `offset` of the arena.
    pub fn word(&self, offset: usize) -> i32 {
        self.arena.word(offset)
    }

    pub fn arena(&self) -> &Arena<N> {
        &self.arena
    }

    /// A cursor at the first block.
    pub fn begin(&self) -> BlockCursor<'_, N> {
        BlockCursor::new(&self.arena, 0)
    }

    /// The cursor one past the last block.
    pub fn end(&self) -> BlockCursor<'_, N> {
        BlockCursor::new(&self.arena, N)
    }

    /// A cursor at the first block through which header sentinels can be overwritten.
    ///
    /// Writes through this cursor bypass all bookkeeping; [`valid`](Self::valid) is the only thing that notices
    /// when they break the arena.
    pub fn begin_mut(&mut self) -> BlockCursorMut<'_, N> {
        BlockCursorMut::new(&mut self.arena, 0)
    }

    /// All blocks of the arena in address order.
    pub fn blocks(&self) -> Blocks<'_, N> {
        Blocks::new(&self.arena)
    }
}

impl<T: Element, const N: usize> Clone for SentinelAllocator<T, N> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            _element: PhantomData,
        }
    }
}

/// Renders a block as `<size Free|Used>`
struct BlockRepr(Block);

impl Debug for BlockRepr {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "<{} {}>",
            self.0.size(),
            if self.0.is_free() { "Free" } else { "Used" }
        )
    }
}

impl<T: Element, const N: usize> Debug for SentinelAllocator<T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match f.alternate() {
            false => f
                .debug_struct("SentinelAllocator")
                .field("capacity", &N)
                .field("arena", &self.arena.bytes())
                .finish(),
            true if !self.valid() => f
                .debug_struct("SentinelAllocator")
                .field("capacity", &N)
                .field("blocks", &"<corrupted>")
                .finish(),
            true => f
                .debug_struct("SentinelAllocator")
                .field("capacity", &N)
                .field(
                    "blocks",
                    &DebugBlocks {
                        blocks: self.blocks(),
                    },
                )
                .finish(),
        }
    }
}

struct DebugBlocks<'a, const N: usize> {
    blocks: Blocks<'a, N>,
}

impl<const N: usize> Debug for DebugBlocks<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.blocks.clone().map(BlockRepr))
            .finish()
    }
}
