//! compression/mod.rs
//! Multi-codec message compression over segmented buffers.
//!
//! Notes:
//! - Codec contexts are single-use and built per call by the registry.
//! - The engine owns policy, fallback and rollback; codecs only transform bytes.
//! - Deflate is zlib-wrapped (RFC 1950), Gzip is RFC 1952, LZ4 is the LZ4 frame format.

pub mod constants;
pub mod types;
pub mod policy;
pub mod registry;
pub mod codecs;
pub mod report;
pub mod engine;

pub use constants::*;
pub use types::*;
pub use policy::*;
pub use registry::*;
pub use report::*;
pub use engine::{compress, decompress, CompressionEngine};
