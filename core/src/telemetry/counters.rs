//! telemetry/counters.rs
//! Mutable counters fed from `TransformResult`s.
//!
//! Summary: Counts calls per direction and outcome, and the byte totals on
//! both sides of the codec. Converted into a `TelemetrySnapshot` at the end.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

use crate::compression::{CompressionAlgorithm, CompressionError};
use crate::types::{Direction, PassThroughReason, TransformResult, TransformStatus};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub compress_calls: u64,
    pub decompress_calls: u64,
    /// Calls whose codec output was kept, encodes and decodes alike.
    pub compressed: u64,
    pub passed_through: u64,
    pub failed: u64,
    /// Pass-throughs caused by a codec error or an unmet shrink policy.
    pub fallbacks: u64,
    /// Plain-side bytes of calls whose codec output was kept.
    pub bytes_uncompressed: u64,
    /// Encoded-side bytes of the same calls.
    pub bytes_compressed: u64,
    /// Bytes copied through unchanged.
    pub bytes_passed_through: u64,
}

impl TelemetryCounters {
    /// Record one finished call.
    ///
    /// For `Compress`, `bytes_in` is plain and `bytes_out` encoded; for
    /// `Decompress` it is the other way round.
    pub fn record(&mut self, direction: Direction, result: &TransformResult) {
        match direction {
            Direction::Compress   => self.compress_calls += 1,
            Direction::Decompress => self.decompress_calls += 1,
        }

        match result.status {
            TransformStatus::Compressed => {
                self.compressed += 1;
                let (plain, encoded) = match direction {
                    Direction::Compress   => (result.bytes_in, result.bytes_out),
                    Direction::Decompress => (result.bytes_out, result.bytes_in),
                };
                self.bytes_uncompressed += plain as u64;
                self.bytes_compressed += encoded as u64;
            }
            TransformStatus::PassThrough => {
                self.passed_through += 1;
                if matches!(result.reason, Some(PassThroughReason::Fallback(_))) {
                    self.fallbacks += 1;
                }
                self.bytes_passed_through += result.bytes_in as u64;
            }
            TransformStatus::Failed => self.failed += 1,
        }
    }

    /// Record the outcome of `CompressionEngine::decompress`.
    pub fn record_decompress(
        &mut self,
        outcome: &Result<TransformResult, CompressionError>,
        algorithm: CompressionAlgorithm,
        bytes_in: usize,
    ) {
        match outcome {
            Ok(result) => self.record(Direction::Decompress, result),
            Err(err) => {
                let failed = TransformResult::failed(algorithm, bytes_in, err.kind(), Default::default());
                self.record(Direction::Decompress, &failed);
            }
        }
    }

    pub fn calls(&self) -> u64 {
        self.compress_calls + self.decompress_calls
    }

    /// Plain-side bytes handled, coded or not.
    pub fn bytes_total(&self) -> u64 {
        self.bytes_uncompressed + self.bytes_passed_through
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.compress_calls += other.compress_calls;
        self.decompress_calls += other.decompress_calls;
        self.compressed += other.compressed;
        self.passed_through += other.passed_through;
        self.failed += other.failed;
        self.fallbacks += other.fallbacks;

        self.bytes_uncompressed += other.bytes_uncompressed;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_passed_through += other.bytes_passed_through;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
