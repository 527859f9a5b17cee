//! codecs/identity.rs
//! Pass-through codec. Shares input segments, never copies bytes.

use crate::buffer::SegmentedBuffer;
use crate::compression::types::{CompressionError, Compressor, Decompressor};

#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityCodec;

impl IdentityCodec {
    pub fn new() -> Self { Self }

    /// Append a reference-sharing copy of every input segment, in order.
    pub fn transform(input: &SegmentedBuffer, output: &mut SegmentedBuffer) {
        for segment in input {
            output.append(segment.clone());
        }
    }
}

impl Compressor for IdentityCodec {
    fn compress(self: Box<Self>, input: &SegmentedBuffer, output: &mut SegmentedBuffer)
        -> Result<(), CompressionError>
    {
        Self::transform(input, output);
        Ok(())
    }
}

impl Decompressor for IdentityCodec {
    fn decompress(self: Box<Self>, input: &SegmentedBuffer, output: &mut SegmentedBuffer)
        -> Result<(), CompressionError>
    {
        Self::transform(input, output);
        Ok(())
    }
}
