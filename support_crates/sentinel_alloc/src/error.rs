use thiserror_no_std::Error;

/// The two broad categories into which all allocator errors fall
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ErrorKind {
    /// The arena is too small or has no free block that can hold the request.
    BadAlloc,
    /// A pointer handed to the allocator does not denote a currently allocated block.
    InvalidArgument,
}

/// The error returned when an allocator operation fails.
///
/// Whenever an error is returned the arena has not been modified.
#[derive(Debug, Error, Eq, PartialEq, Copy, Clone)]
pub enum AllocError {
    #[error("an arena of {capacity} bytes cannot hold a block of the minimal size of {minimum} bytes")]
    CapacityTooSmall { capacity: usize, minimum: usize },
    #[error("the allocator has no free block that can hold {requested} bytes")]
    InsufficientMemory { requested: usize },
    #[error("offset {offset} does not lie inside the arena")]
    OutOfBounds { offset: usize },
    #[error("the block at offset {offset} is not allocated")]
    NotAllocated { offset: usize },
    #[error("offset {offset} does not denote the start of a block")]
    MalformedBlock { offset: usize },
}

impl AllocError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AllocError::CapacityTooSmall { .. } | AllocError::InsufficientMemory { .. } => {
                ErrorKind::BadAlloc
            }
            AllocError::OutOfBounds { .. }
            | AllocError::NotAllocated { .. }
            | AllocError::MalformedBlock { .. } => ErrorKind::InvalidArgument,
        }
    }
}
