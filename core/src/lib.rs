//! message-compress
//!
//! Streaming multi-codec message compression over segmented buffers.
//! Identity, DEFLATE (zlib), GZIP and LZ4 frame backends behind one engine.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Buffers and codecs
pub mod buffer;
pub mod compression;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::buffer::{Segment, SegmentedBuffer};
    pub use crate::compression::{
        compress, decompress, CompressionAlgorithm, CompressionEngine, CompressionError,
        CompressionPolicy, ErrorKind,
    };
    pub use crate::config::EngineConfig;
    pub use crate::types::{Direction, PassThroughReason, TransformResult, TransformStatus};
}
