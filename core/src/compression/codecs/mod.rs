//! compression/codecs/mod.rs
//! Backend implementations. Each backend is a single-use context created
//! fresh for one call by the registry.

pub mod identity;
pub mod lz4;
pub mod zlib;

pub use identity::*;
pub use lz4::{BlockSizeId, FrameHeader, FramePreferences, Lz4Compressor, Lz4Decompressor, FRAME_PREFERENCES};
pub use zlib::*;
