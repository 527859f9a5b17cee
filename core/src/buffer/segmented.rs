//! buffer/segmented.rs
//! Ordered, length-tracked sequence of immutable reference-counted segments.
//!
//! Summary: a `SegmentedBuffer` is the only data structure the engine reads
//! from and appends to. Segments are `bytes::Bytes`, so sharing a segment
//! between buffers (and threads) only bumps an atomic reference count.

use std::fmt;
use bytes::{Buf, Bytes, BytesMut};

/// An immutable, reference-counted run of bytes.
pub type Segment = Bytes;

/// Rollback point captured before a transform appends anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub length: usize,
    pub segment_count: usize,
}

/// Ordered segments plus a cached total length.
///
/// Invariant: `length == sum(segment.len())`. The only mutations are
/// `append` and `truncate_to` a checkpoint taken earlier on the same buffer.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SegmentedBuffer {
    segments: Vec<Segment>,
    length: usize,
}

impl SegmentedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(segments: usize) -> Self {
        Self { segments: Vec::with_capacity(segments), length: 0 }
    }

    /// Copy each part into its own segment, preserving the split.
    pub fn from_slices<I, T>(parts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        parts
            .into_iter()
            .map(|part| Bytes::copy_from_slice(part.as_ref()))
            .collect()
    }

    /// Split `data` into segments of at most `chunk_size` bytes.
    /// All segments share one allocation.
    pub fn chunked(data: &[u8], chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be non-zero");
        let whole = Bytes::copy_from_slice(data);
        let mut buffer = Self::with_capacity(data.len().div_ceil(chunk_size));
        let mut offset = 0;
        while offset < whole.len() {
            let end = (offset + chunk_size).min(whole.len());
            buffer.append(whole.slice(offset..end));
            offset = end;
        }
        buffer
    }

    /// O(1) append.
    #[inline]
    pub fn append(&mut self, segment: Segment) {
        self.length += segment.len();
        self.segments.push(segment);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint { length: self.length, segment_count: self.segments.len() }
    }

    /// Release every segment appended after `checkpoint` and restore the
    /// cached length. Segments are dropped, not just unlinked.
    ///
    /// Panics if the checkpoint does not belong to this buffer's history.
    pub fn truncate_to(&mut self, checkpoint: Checkpoint) {
        assert!(
            checkpoint.segment_count <= self.segments.len() && checkpoint.length <= self.length,
            "checkpoint {:?} is past the end of the buffer ({} bytes, {} segments)",
            checkpoint,
            self.length,
            self.segments.len(),
        );
        self.segments.truncate(checkpoint.segment_count);
        self.length = checkpoint.length;
        debug_assert_eq!(
            self.length,
            self.segments.iter().map(Bytes::len).sum::<usize>(),
            "checkpoint length does not match retained segments"
        );
    }

    #[inline]
    pub fn total_length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segments in order. Calling again restarts from the first segment.
    pub fn segments(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn for_each_segment<F: FnMut(&Segment)>(&self, f: F) {
        self.segments.iter().for_each(f)
    }

    /// Read-only cursor over the logical byte stream.
    pub fn cursor(&self) -> SegmentCursor<'_> {
        SegmentCursor::new(&self.segments, self.length)
    }

    /// Concatenate all segments into a fresh vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.length);
        for segment in &self.segments {
            out.extend_from_slice(segment);
        }
        out
    }

    /// Contiguous view of the payload. Zero-copy when there is at most one segment.
    pub fn to_bytes(&self) -> Bytes {
        match self.segments.as_slice() {
            [] => Bytes::new(),
            [single] => single.clone(),
            many => {
                let mut out = BytesMut::with_capacity(self.length);
                for segment in many {
                    out.extend_from_slice(segment);
                }
                out.freeze()
            }
        }
    }
}

impl fmt::Debug for SegmentedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedBuffer")
            .field("length", &self.length)
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl FromIterator<Segment> for SegmentedBuffer {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut buffer = Self::new();
        for segment in iter {
            buffer.append(segment);
        }
        buffer
    }
}

impl From<Bytes> for SegmentedBuffer {
    fn from(segment: Bytes) -> Self {
        let mut buffer = Self::with_capacity(1);
        if !segment.is_empty() {
            buffer.append(segment);
        }
        buffer
    }
}

impl From<Vec<u8>> for SegmentedBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from(Bytes::from(data))
    }
}

impl<'a> IntoIterator for &'a SegmentedBuffer {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// `bytes::Buf` over a segment slice. Never mutates the segments; cloning
/// a cursor is cheap and yields an independent read position.
#[derive(Clone, Debug)]
pub struct SegmentCursor<'a> {
    segments: &'a [Segment],
    index: usize,
    offset: usize,
    remaining: usize,
}

impl<'a> SegmentCursor<'a> {
    fn new(segments: &'a [Segment], remaining: usize) -> Self {
        let mut cursor = Self { segments, index: 0, offset: 0, remaining };
        cursor.skip_exhausted();
        cursor
    }

    // Keep `index` on a segment with unread bytes so `chunk()` is never
    // empty while `remaining > 0`.
    fn skip_exhausted(&mut self) {
        while let Some(segment) = self.segments.get(self.index) {
            if self.offset < segment.len() {
                break;
            }
            self.index += 1;
            self.offset = 0;
        }
    }
}

impl Buf for SegmentCursor<'_> {
    fn remaining(&self) -> usize {
        self.remaining
    }

    fn chunk(&self) -> &[u8] {
        match self.segments.get(self.index) {
            Some(segment) => &segment[self.offset..],
            None => &[],
        }
    }

    fn advance(&mut self, mut cnt: usize) {
        assert!(
            cnt <= self.remaining,
            "cannot advance past end: {} > {}",
            cnt,
            self.remaining
        );
        self.remaining -= cnt;
        while cnt > 0 {
            let available = self.segments[self.index].len() - self.offset;
            if cnt < available {
                self.offset += cnt;
                cnt = 0;
            } else {
                cnt -= available;
                self.index += 1;
                self.offset = 0;
            }
        }
        self.skip_exhausted();
    }
}
