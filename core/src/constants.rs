//! constants.rs
//! Sizes and defaults shared by the backends and the engine.

/// Scratch window used by the zlib-family backend (1 KiB).
/// Every full window becomes one output segment.
pub const DEFAULT_WINDOW_SIZE: usize = 1024;
pub const MAX_WINDOW_SIZE: usize = 1024 * 1024;

/// Decompressed LZ4 output smaller than this is batched before being
/// emitted as a segment.
pub const DEFAULT_LZ4_COALESCE_THRESHOLD: usize = 1024;
/// Never batch past the largest block a frame can declare.
pub const MAX_LZ4_COALESCE_THRESHOLD: usize = lz4_block_sizes::MAX_4MB;

/// zlib `Z_DEFAULT_COMPRESSION` resolves to level 6.
pub const DEFAULT_DEFLATE_LEVEL: u32 = 6;
pub const MAX_DEFLATE_LEVEL: u32 = 9;

/// LZ4 frame level 0 = fast mode.
pub const DEFAULT_LZ4_LEVEL: u32 = 0;
pub const MAX_LZ4_LEVEL: u32 = 16;

/// zlib window bits used on both the zlib and gzip envelopes.
pub const ZLIB_WINDOW_BITS: u8 = 15;

/// LZ4 frame magic number (little endian on the wire).
pub const LZ4_FRAME_MAGIC: u32 = 0x184D_2204;

/// Minimum bytes needed to read magic + FLG + BD.
pub const LZ4_FRAME_PREFIX_LEN: usize = 6;

/// Block maximum sizes addressable by the frame descriptor.
pub mod lz4_block_sizes {
    pub const MAX_64KB: usize  = 64 * 1024;
    pub const MAX_256KB: usize = 256 * 1024;
    pub const MAX_1MB: usize   = 1024 * 1024;
    pub const MAX_4MB: usize   = 4 * 1024 * 1024;
}
