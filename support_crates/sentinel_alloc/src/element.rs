use core::mem;

/// A fixed-size value that can be stored in the payload of an allocation.
///
/// The byte width of the element type is the allocation unit of a [`SentinelAllocator`](crate::SentinelAllocator):
/// requesting `n` elements reserves `n * SIZE` payload bytes.
/// Payload bytes are opaque to the allocator, so an element is responsible for encoding itself into and decoding
/// itself from a chunk of exactly `SIZE` bytes.
pub trait Element: Sized {
    /// How many bytes one element occupies inside a payload.
    const SIZE: usize;

    /// Write the element into the first `SIZE` bytes of `chunk`.
    fn write_to_chunk(&self, chunk: &mut [u8]);

    /// Read an element from the first `SIZE` bytes of `chunk`.
    fn read_from_chunk(chunk: &[u8]) -> Self;
}

/// Implement [`Element`] for a primitive number type using its native-endian byte representation.
macro_rules! impl_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                const SIZE: usize = mem::size_of::<$t>();

                fn write_to_chunk(&self, chunk: &mut [u8]) {
                    chunk[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
                }

                fn read_from_chunk(chunk: &[u8]) -> Self {
                    assert!(
                        chunk.len() >= Self::SIZE,
                        "chunk is not large enough to contain an element"
                    );
                    <$t>::from_ne_bytes(chunk[..Self::SIZE].try_into().unwrap())
                }
            }
        )*
    };
}

impl_element!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
