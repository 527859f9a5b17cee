//! buffer/transaction.rs
//! Scoped all-or-nothing append over a caller-owned output buffer.

use std::ops::{Deref, DerefMut};

use crate::buffer::segmented::{Checkpoint, SegmentedBuffer};

/// Captures the output checkpoint on creation. Unless `commit` is called,
/// dropping the transaction releases every segment appended through it,
/// on every exit path including `?` early returns.
pub struct OutputTransaction<'a> {
    buffer: &'a mut SegmentedBuffer,
    checkpoint: Checkpoint,
    committed: bool,
}

impl<'a> OutputTransaction<'a> {
    pub fn begin(buffer: &'a mut SegmentedBuffer) -> Self {
        let checkpoint = buffer.checkpoint();
        Self { buffer, checkpoint, committed: false }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint
    }

    /// Bytes appended since the transaction began.
    pub fn appended_len(&self) -> usize {
        self.buffer.total_length() - self.checkpoint.length
    }

    pub fn appended_segments(&self) -> usize {
        self.buffer.segment_count() - self.checkpoint.segment_count
    }

    /// Keep the appended segments. Returns the appended byte count.
    pub fn commit(mut self) -> usize {
        self.committed = true;
        self.appended_len()
    }

    /// Release the appended segments now. Returns how many were released.
    pub fn rollback(mut self) -> usize {
        let released = self.appended_segments();
        self.buffer.truncate_to(self.checkpoint);
        self.committed = true;
        released
    }
}

impl Deref for OutputTransaction<'_> {
    type Target = SegmentedBuffer;

    fn deref(&self) -> &SegmentedBuffer {
        self.buffer
    }
}

impl DerefMut for OutputTransaction<'_> {
    fn deref_mut(&mut self) -> &mut SegmentedBuffer {
        self.buffer
    }
}

impl Drop for OutputTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.buffer.truncate_to(self.checkpoint);
        }
    }
}
