//! buffer/scratch.rs
//! Per-call scratch window and an `io::Write` adapter that emits segments.

use std::io;
use bytes::{Bytes, BytesMut};

use crate::buffer::alloc::SegmentAllocator;
use crate::buffer::segmented::SegmentedBuffer;

/// Fixed-capacity output window a backend writes into directly.
///
/// A full window is frozen into a segment without copying and replaced by a
/// fresh allocation, so emitted segments never alias the live window.
pub struct ScratchWindow<'a> {
    allocator: &'a dyn SegmentAllocator,
    capacity: usize,
    buf: BytesMut,
    filled: usize,
}

impl<'a> ScratchWindow<'a> {
    pub fn new(allocator: &'a dyn SegmentAllocator, capacity: usize) -> Self {
        assert!(capacity > 0, "scratch window capacity must be non-zero");
        let buf = Self::fresh(allocator, capacity);
        Self { allocator, capacity, buf, filled: 0 }
    }

    fn fresh(allocator: &dyn SegmentAllocator, capacity: usize) -> BytesMut {
        let mut buf = allocator.allocate(capacity);
        buf.resize(capacity, 0);
        buf
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled == self.capacity
    }

    /// Unwritten tail of the window.
    #[inline]
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.filled..]
    }

    /// Mark `n` bytes of the spare area as produced.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.filled + n <= self.capacity);
        self.filled += n;
    }

    /// Hand out the full window as a segment and start a new one.
    pub fn rotate(&mut self) -> Bytes {
        debug_assert!(self.is_full());
        let next = Self::fresh(self.allocator, self.capacity);
        self.filled = 0;
        std::mem::replace(&mut self.buf, next).freeze()
    }

    /// Trim the window to the bytes actually produced. `None` when nothing was.
    pub fn finish(mut self) -> Option<Bytes> {
        if self.filled == 0 {
            return None;
        }
        self.buf.truncate(self.filled);
        Some(self.buf.freeze())
    }
}

/// `io::Write` sink that turns every non-empty write into its own segment,
/// copied out of the caller's buffer.
pub struct SegmentSink<'a> {
    output: &'a mut SegmentedBuffer,
    allocator: &'a dyn SegmentAllocator,
    written: usize,
}

impl<'a> SegmentSink<'a> {
    pub fn new(output: &'a mut SegmentedBuffer, allocator: &'a dyn SegmentAllocator) -> Self {
        Self { output, allocator, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl io::Write for SegmentSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut segment = self.allocator.allocate(buf.len());
        segment.extend_from_slice(buf);
        self.output.append(segment.freeze());
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
