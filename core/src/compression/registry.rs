//! compression/registry.rs
//! Closed dispatch from algorithm to backend context.
//!
//! Every match here is exhaustive over `CompressionAlgorithm`; raw selectors
//! outside the enumerated set are rejected earlier by `CompressionAlgorithm::from_raw`.

use std::sync::Arc;

use crate::buffer::SegmentAllocator;
use crate::compression::codecs::{IdentityCodec, Lz4Compressor, Lz4Decompressor, ZlibCompressor, ZlibDecompressor, ZlibFormat};
use crate::compression::types::{CompressionAlgorithm, CompressionError, Compressor, Decompressor};
use crate::config::EngineConfig;

pub struct CodecInfo {
    pub algorithm: CompressionAlgorithm,
    pub name: &'static str,
    /// Level the engine uses with the given config; `None` for identity.
    pub level: Option<u32>,
}

pub fn resolve(algorithm: CompressionAlgorithm, config: &EngineConfig) -> CodecInfo {
    let level = match algorithm {
        CompressionAlgorithm::None => None,
        CompressionAlgorithm::Deflate | CompressionAlgorithm::Gzip => Some(config.deflate_level),
        CompressionAlgorithm::Lz4 => Some(config.lz4_level),
    };
    CodecInfo { algorithm, name: algorithm.name(), level }
}

pub fn create_compressor(
    algorithm: CompressionAlgorithm,
    config: &EngineConfig,
    allocator: &Arc<dyn SegmentAllocator>,
) -> Result<Box<dyn Compressor + Send>, CompressionError> {
    match algorithm {
        CompressionAlgorithm::None => Ok(Box::new(IdentityCodec::new())),
        CompressionAlgorithm::Deflate => ZlibCompressor::new(
            ZlibFormat::Zlib,
            config.deflate_level,
            config.window_size,
            Arc::clone(allocator),
        ),
        CompressionAlgorithm::Gzip => ZlibCompressor::new(
            ZlibFormat::Gzip,
            config.deflate_level,
            config.window_size,
            Arc::clone(allocator),
        ),
        CompressionAlgorithm::Lz4 => Lz4Compressor::new(config.lz4_level, Arc::clone(allocator)),
    }
}

pub fn create_decompressor(
    algorithm: CompressionAlgorithm,
    config: &EngineConfig,
    allocator: &Arc<dyn SegmentAllocator>,
) -> Result<Box<dyn Decompressor + Send>, CompressionError> {
    match algorithm {
        CompressionAlgorithm::None => Ok(Box::new(IdentityCodec::new())),
        CompressionAlgorithm::Deflate => ZlibDecompressor::new(
            ZlibFormat::Zlib,
            config.window_size,
            config.max_decompressed_len,
            Arc::clone(allocator),
        ),
        CompressionAlgorithm::Gzip => ZlibDecompressor::new(
            ZlibFormat::Gzip,
            config.window_size,
            config.max_decompressed_len,
            Arc::clone(allocator),
        ),
        CompressionAlgorithm::Lz4 => Lz4Decompressor::new(
            config.lz4_coalesce_threshold,
            config.max_decompressed_len,
            Arc::clone(allocator),
        ),
    }
}
