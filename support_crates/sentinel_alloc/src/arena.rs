//! The raw byte storage of an allocator and the word accessor on top of it.

use static_assertions::const_assert_eq;

/// How many bytes a single sentinel occupies.
pub const SENTINEL_SIZE: usize = core::mem::size_of::<i32>();

/// How many bytes of bookkeeping each block carries (a header and a footer sentinel).
pub const TAGS_SIZE: usize = 2 * SENTINEL_SIZE;

const_assert_eq!(SENTINEL_SIZE, 4);
const_assert_eq!(TAGS_SIZE, 8);

/// A fixed-length byte buffer that can also be viewed as native-endian `i32` words at arbitrary byte offsets.
///
/// The arena performs no bookkeeping on its own.
/// Offsets are not checked against sentinel boundaries; reading or writing a word that would run past the end of
/// the buffer panics like any other out-of-bounds slice access.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Arena<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Arena<N> {
    /// Create a zero-filled arena.
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    /// The capacity of the arena in bytes.
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Read the four bytes starting at `offset` as a signed word.
    pub fn word(&self, offset: usize) -> i32 {
        i32::from_ne_bytes(
            self.bytes[offset..offset + SENTINEL_SIZE]
                .try_into()
                .unwrap(),
        )
    }

    /// Overwrite the four bytes starting at `offset` with `value`.
    pub fn set_word(&mut self, offset: usize, value: i32) {
        self.bytes[offset..offset + SENTINEL_SIZE].copy_from_slice(&value.to_ne_bytes());
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl<const N: usize> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}
