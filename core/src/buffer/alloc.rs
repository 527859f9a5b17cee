//! buffer/alloc.rs
//! Allocation interface injected into codec contexts at creation time.

use std::fmt;
use bytes::BytesMut;

/// Source of scratch windows and output segments for a backend.
///
/// Implementations must be shareable across threads: one allocator serves
/// every call an engine makes, while each call owns what it allocates.
pub trait SegmentAllocator: Send + Sync + fmt::Debug {
    /// Return an empty buffer with at least `capacity` bytes reserved.
    fn allocate(&self, capacity: usize) -> BytesMut;
}

/// Global heap via `BytesMut::with_capacity`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl SegmentAllocator for HeapAllocator {
    #[inline]
    fn allocate(&self, capacity: usize) -> BytesMut {
        BytesMut::with_capacity(capacity)
    }
}
