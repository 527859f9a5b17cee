//! codecs/lz4.rs
//! LZ4 frame compressor/decompressor over segmented buffers.
//!
//! The frame preference set is a wire contract: peers decode these frames
//! with independent implementations, so both directions use the same
//! `FRAME_PREFERENCES`.

use std::io::{Read, Write};
use std::sync::Arc;
use bytes::Buf;
use lz4::liblz4::BlockChecksum;
use lz4::{BlockMode, BlockSize, ContentChecksum, Decoder, EncoderBuilder};
use num_enum::TryFromPrimitive;

use crate::buffer::{SegmentAllocator, SegmentSink, SegmentedBuffer};
use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::constants::{
    lz4_block_sizes, LZ4_FRAME_MAGIC, LZ4_FRAME_PREFIX_LEN, MAX_LZ4_COALESCE_THRESHOLD, MAX_LZ4_LEVEL,
};

const CODEC: &str = "lz4";

/// Block maximum size as encoded in bits 6..4 of the frame BD byte.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum BlockSizeId {
    Max64KB  = 4,
    Max256KB = 5,
    Max1MB   = 6,
    Max4MB   = 7,
}

impl BlockSizeId {
    pub fn bytes(self) -> usize {
        match self {
            BlockSizeId::Max64KB  => lz4_block_sizes::MAX_64KB,
            BlockSizeId::Max256KB => lz4_block_sizes::MAX_256KB,
            BlockSizeId::Max1MB   => lz4_block_sizes::MAX_1MB,
            BlockSizeId::Max4MB   => lz4_block_sizes::MAX_4MB,
        }
    }

    fn to_lz4(self) -> BlockSize {
        match self {
            BlockSizeId::Max64KB  => BlockSize::Max64KB,
            BlockSizeId::Max256KB => BlockSize::Max256KB,
            BlockSizeId::Max1MB   => BlockSize::Max1MB,
            BlockSizeId::Max4MB   => BlockSize::Max4MB,
        }
    }
}

/// Frame options written by the compressor. Every flag is set explicitly;
/// the `lz4` builder defaults differ between releases.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FramePreferences {
    pub block_size: BlockSizeId,
    pub linked_blocks: bool,
    pub block_checksum: bool,
    pub content_checksum: bool,
}

pub const FRAME_PREFERENCES: FramePreferences = FramePreferences {
    block_size: BlockSizeId::Max256KB,
    linked_blocks: true,
    block_checksum: false,
    content_checksum: false,
};

/// Fields of the frame descriptor the decompressor needs up front.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    pub block_size: BlockSizeId,
    pub linked_blocks: bool,
    pub block_checksum: bool,
    pub content_size: bool,
    pub content_checksum: bool,
}

impl FrameHeader {
    /// Parse magic, FLG and BD from the start of `buf` without consuming
    /// anything the caller still needs (pass a clone of the cursor).
    pub fn parse<B: Buf>(mut buf: B) -> Result<Self, CompressionError> {
        if buf.remaining() < LZ4_FRAME_PREFIX_LEN {
            return Err(CompressionError::TruncatedFrame(format!(
                "lz4 frame header needs {} bytes, input has {}",
                LZ4_FRAME_PREFIX_LEN,
                buf.remaining()
            )));
        }
        let magic = buf.get_u32_le();
        if magic != LZ4_FRAME_MAGIC {
            return Err(CompressionError::stream(CODEC, format!("bad frame magic 0x{:08x}", magic)));
        }
        let flg = buf.get_u8();
        let bd = buf.get_u8();

        let version = flg >> 6;
        if version != 1 {
            return Err(CompressionError::stream(CODEC, format!("unsupported frame version {}", version)));
        }
        let id = (bd >> 4) & 0x07;
        let block_size = BlockSizeId::try_from_primitive(id).map_err(|_| {
            CompressionError::TruncatedFrame(format!("unrecognized lz4 block size id {}", id))
        })?;

        Ok(Self {
            block_size,
            linked_blocks: flg & 0x20 == 0,
            block_checksum: flg & 0x10 != 0,
            content_size: flg & 0x08 != 0,
            content_checksum: flg & 0x04 != 0,
        })
    }
}

pub struct Lz4Compressor {
    level: u32,
    prefs: FramePreferences,
    allocator: Arc<dyn SegmentAllocator>,
}

impl Lz4Compressor {
    pub fn new(level: u32, allocator: Arc<dyn SegmentAllocator>)
        -> Result<Box<dyn Compressor + Send>, CompressionError>
    {
        if level > MAX_LZ4_LEVEL {
            return Err(CompressionError::init(CODEC, format!("level {} outside 0..={}", level, MAX_LZ4_LEVEL)));
        }
        Ok(Box::new(Self { level, prefs: FRAME_PREFERENCES, allocator }))
    }

    fn builder(&self) -> EncoderBuilder {
        let mut builder = EncoderBuilder::new();
        builder
            .block_size(self.prefs.block_size.to_lz4())
            .block_mode(if self.prefs.linked_blocks { BlockMode::Linked } else { BlockMode::Independent })
            .checksum(if self.prefs.content_checksum {
                ContentChecksum::ChecksumEnabled
            } else {
                ContentChecksum::NoChecksum
            })
            .block_checksum(if self.prefs.block_checksum {
                BlockChecksum::BlockChecksumEnabled
            } else {
                BlockChecksum::NoBlockChecksum
            })
            .level(self.level);
        builder
    }
}

impl Compressor for Lz4Compressor {
    /// Header first, then one segment per non-empty update, then the end mark
    /// and any buffered block as the final segment.
    fn compress(self: Box<Self>, input: &SegmentedBuffer, output: &mut SegmentedBuffer)
        -> Result<(), CompressionError>
    {
        let builder = self.builder();
        let sink = SegmentSink::new(output, self.allocator.as_ref());
        let mut encoder = builder
            .build(sink)
            .map_err(|e| CompressionError::init(CODEC, e))?;

        for segment in input {
            encoder
                .write_all(segment)
                .map_err(|e| CompressionError::stream(CODEC, e))?;
        }

        let (_sink, result) = encoder.finish();
        result.map_err(|e| CompressionError::stream(CODEC, e))
    }
}

pub struct Lz4Decompressor {
    coalesce_threshold: usize,
    limit: Option<usize>,
    allocator: Arc<dyn SegmentAllocator>,
}

impl Lz4Decompressor {
    pub fn new(
        coalesce_threshold: usize,
        limit: Option<usize>,
        allocator: Arc<dyn SegmentAllocator>,
    ) -> Result<Box<dyn Decompressor + Send>, CompressionError> {
        if coalesce_threshold > MAX_LZ4_COALESCE_THRESHOLD {
            return Err(CompressionError::init(
                CODEC,
                format!("coalesce threshold {} > {}", coalesce_threshold, MAX_LZ4_COALESCE_THRESHOLD),
            ));
        }
        Ok(Box::new(Self { coalesce_threshold, limit, allocator }))
    }
}

impl Decompressor for Lz4Decompressor {
    fn decompress(self: Box<Self>, input: &SegmentedBuffer, output: &mut SegmentedBuffer)
        -> Result<(), CompressionError>
    {
        if input.is_empty() {
            return Ok(());
        }

        // Header first: the negotiated block size bounds one decoded step.
        let header = FrameHeader::parse(input.cursor())?;
        let capacity = header.block_size.bytes();

        let mut decoder = Decoder::new(input.cursor().reader())
            .map_err(|e| CompressionError::init(CODEC, e))?;

        let mut scratch = self.allocator.allocate(capacity);
        scratch.resize(capacity, 0);
        let mut pending = self.allocator.allocate(self.coalesce_threshold);
        let mut produced = 0usize;

        loop {
            let n = decoder
                .read(&mut scratch[..])
                .map_err(|e| CompressionError::stream(CODEC, e))?;
            if n == 0 {
                break;
            }
            produced += n;
            if let Some(limit) = self.limit {
                if produced > limit {
                    return Err(CompressionError::DecompressedSizeExceeded { limit });
                }
            }
            pending.extend_from_slice(&scratch[..n]);
            if pending.len() >= self.coalesce_threshold {
                output.append(pending.split().freeze());
            }
        }

        let (reader, result) = decoder.finish();
        result.map_err(|e| CompressionError::TruncatedFrame(format!("lz4 frame incomplete: {}", e)))?;

        let trailing = reader.into_inner().remaining();
        if trailing > 0 {
            return Err(CompressionError::TruncatedFrame(format!(
                "{} bytes of trailing data after lz4 frame",
                trailing
            )));
        }

        if !pending.is_empty() {
            output.append(pending.freeze());
        }
        Ok(())
    }
}
