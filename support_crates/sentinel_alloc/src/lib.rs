//! A fixed capacity allocator that manages a single byte array with boundary tags.
//!
//! Every block in the arena is framed by two signed 32-bit *sentinels*, one in its first four bytes and one in its
//! last four bytes.
//! A positive sentinel marks a free block and holds the number of payload bytes between the two sentinels, a
//! negative sentinel marks an allocated block and holds the negated payload size.
//!
//! ```text
//!   offset 0                                                                          offset N
//!   ┌─────┬──────────────┬─────┬─────┬───────────────────────────────────────────┬─────┐
//!   │ -16 │   payload    │ -16 │ 968 │                  free                     │ 968 │
//!   └─────┴──────────────┴─────┴─────┴───────────────────────────────────────────┴─────┘
//!         ▲
//!         └── PayloadPtr handed out by allocate()
//! ```
//!
//! Blocks always tile the arena exactly, which is what [`SentinelAllocator::valid`] checks.
//!
//! # Example
//!
//! ```rust
//! # use sentinel_alloc::SentinelAllocator;
//! let mut allocator = SentinelAllocator::<u64, 1000>::new().unwrap();
//!
//! let ptr = allocator.allocate(2).unwrap();
//! allocator.construct(ptr, 0x55);
//! allocator.construct(ptr.add(1), 0x66);
//! assert_eq!(allocator.get(ptr.add(1)), 0x66);
//!
//! allocator.deallocate(ptr, 2).unwrap();
//! assert_eq!(allocator.word(0), 992);
//! ```
#![no_std]

mod allocator;
mod arena;
mod block;
mod cursor;
mod element;
mod error;


pub use allocator::{PayloadPtr, SentinelAllocator};
pub use arena::{Arena, SENTINEL_SIZE, TAGS_SIZE};
pub use block::{Block, BlockState};
pub use cursor::{BlockCursor, BlockCursorMut, Blocks};
pub use element::Element;
pub use error::{AllocError, ErrorKind};
