//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for engine calls.
//!
//! Notes:
//! - Counters are plain values; each worker keeps its own and merges at the end.
//! - Snapshots are immutable and serde-serializable.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
