//! compression/types.rs
//! Algorithm selector, error taxonomy and the backend traits.
use std::fmt;
use std::str::FromStr;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::buffer::SegmentedBuffer;
use crate::compression::constants::{algorithm_ids, algorithm_names};
use crate::utils::enum_name_or_hex;

/// Closed set of supported algorithms.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    None    = algorithm_ids::NONE,
    Deflate = algorithm_ids::DEFLATE,
    Gzip    = algorithm_ids::GZIP,
    Lz4     = algorithm_ids::LZ4,
}

impl CompressionAlgorithm {
    pub const ALL: [CompressionAlgorithm; 4] = [
        CompressionAlgorithm::None,
        CompressionAlgorithm::Deflate,
        CompressionAlgorithm::Gzip,
        CompressionAlgorithm::Lz4,
    ];

    /// Resolve a raw selector. Anything outside the enumerated set is a
    /// caller error, never an implicit `None`.
    pub fn from_raw(raw: u8) -> Result<Self, CompressionError> {
        Self::try_from_primitive(raw).map_err(|_| CompressionError::UnsupportedAlgorithm { raw })
    }

    pub fn as_raw(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionAlgorithm::None    => algorithm_names::NONE,
            CompressionAlgorithm::Deflate => algorithm_names::DEFLATE,
            CompressionAlgorithm::Gzip    => algorithm_names::GZIP,
            CompressionAlgorithm::Lz4     => algorithm_names::LZ4,
        }
    }

    /// True for every variant that runs a real codec.
    pub fn is_codec(self) -> bool {
        !matches!(self, CompressionAlgorithm::None)
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompressionAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(CompressionError::UnknownAlgorithmName { name: s.to_string() })
    }
}

fn algorithm_label(raw: &u8) -> String {
    enum_name_or_hex::<CompressionAlgorithm>(*raw)
}

#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    /// Backend context allocation or configuration failed.
    #[error("codec {codec} init failed: {msg}")]
    CodecInit { codec: &'static str, msg: String },

    /// Backend reported a non-recoverable error mid-stream, or left input unconsumed.
    #[error("codec {codec} stream error: {msg}")]
    CodecStream { codec: &'static str, msg: String },

    /// Declared frame or header data exceeds or misaligns with the available input.
    #[error("truncated frame: {0}")]
    TruncatedFrame(String),

    #[error("unsupported compression algorithm: {}", algorithm_label(.raw))]
    UnsupportedAlgorithm { raw: u8 },

    #[error("unknown compression algorithm name: {name:?}")]
    UnknownAlgorithmName { name: String },

    /// Compression worked but did not pay off. Compress path only.
    #[error("compressed size {output_len} is not smaller than input size {input_len}")]
    ShrinkPolicyNotMet { input_len: usize, output_len: usize },

    #[error("decompressed size exceeds limit of {limit} bytes")]
    DecompressedSizeExceeded { limit: usize },
}

impl CompressionError {
    pub fn init(codec: &'static str, msg: impl fmt::Display) -> Self {
        CompressionError::CodecInit { codec, msg: msg.to_string() }
    }

    pub fn stream(codec: &'static str, msg: impl fmt::Display) -> Self {
        CompressionError::CodecStream { codec, msg: msg.to_string() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompressionError::CodecInit { .. }                => ErrorKind::CodecInit,
            CompressionError::CodecStream { .. }              => ErrorKind::CodecStream,
            CompressionError::TruncatedFrame(_)               => ErrorKind::TruncatedFrame,
            CompressionError::UnsupportedAlgorithm { .. }
            | CompressionError::UnknownAlgorithmName { .. }   => ErrorKind::UnsupportedAlgorithm,
            CompressionError::ShrinkPolicyNotMet { .. }       => ErrorKind::ShrinkPolicyNotMet,
            CompressionError::DecompressedSizeExceeded { .. } => ErrorKind::DecompressedSizeExceeded,
        }
    }
}

/// Flat classification of `CompressionError`, cheap to copy into logs and counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CodecInit,
    CodecStream,
    TruncatedFrame,
    UnsupportedAlgorithm,
    ShrinkPolicyNotMet,
    DecompressedSizeExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::CodecInit                => "codec_init",
            ErrorKind::CodecStream              => "codec_stream",
            ErrorKind::TruncatedFrame           => "truncated_frame",
            ErrorKind::UnsupportedAlgorithm     => "unsupported_algorithm",
            ErrorKind::ShrinkPolicyNotMet       => "shrink_policy_not_met",
            ErrorKind::DecompressedSizeExceeded => "decompressed_size_exceeded",
        };
        f.write_str(name)
    }
}

/// Single-use compression context. Consumed by the call, so its streaming
/// state can never be reused or shared across calls.
pub trait Compressor: Send {
    /// Append the compressed form of `input` to `output`.
    fn compress(self: Box<Self>, input: &SegmentedBuffer, output: &mut SegmentedBuffer)
        -> Result<(), CompressionError>;
}

/// Single-use decompression context.
pub trait Decompressor: Send {
    /// Append the decompressed form of `input` to `output`.
    fn decompress(self: Box<Self>, input: &SegmentedBuffer, output: &mut SegmentedBuffer)
        -> Result<(), CompressionError>;
}
