use std::fmt;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::compression::{CompressionAlgorithm, ErrorKind};
use crate::utils::ratio;

/// Which way a transform runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Compress,
    Decompress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Compress   => "compress",
            Direction::Decompress => "decompress",
        })
    }
}

/// Outcome flag of one engine call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformStatus {
    /// The codec ran and its output was kept, in either direction. A
    /// successful `decompress` through a real codec reports this too.
    Compressed,
    /// Output is an exact, segment-sharing copy of the input.
    PassThrough,
    /// The call failed; nothing was appended.
    Failed,
}

/// Why a call ended up as a pass-through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassThroughReason {
    /// Algorithm `None` was selected.
    Identity,
    EmptyInput,
    /// Input shorter than the policy's minimum length.
    BelowThreshold,
    /// The codec failed or did not shrink the payload; its output was rolled back.
    Fallback(ErrorKind),
}

/// Per-call result. Not persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    pub status: TransformStatus,
    pub algorithm: CompressionAlgorithm,
    pub bytes_in: usize,
    pub bytes_out: usize,
    pub reason: Option<PassThroughReason>,
    pub error: Option<ErrorKind>,
    pub elapsed: Duration,
}

impl TransformResult {
    pub fn compressed(algorithm: CompressionAlgorithm, bytes_in: usize, bytes_out: usize, elapsed: Duration) -> Self {
        Self {
            status: TransformStatus::Compressed,
            algorithm,
            bytes_in,
            bytes_out,
            reason: None,
            error: None,
            elapsed,
        }
    }

    pub fn pass_through(
        algorithm: CompressionAlgorithm,
        bytes: usize,
        reason: PassThroughReason,
        elapsed: Duration,
    ) -> Self {
        Self {
            status: TransformStatus::PassThrough,
            algorithm,
            bytes_in: bytes,
            bytes_out: bytes,
            reason: Some(reason),
            error: None,
            elapsed,
        }
    }

    pub fn failed(algorithm: CompressionAlgorithm, bytes_in: usize, error: ErrorKind, elapsed: Duration) -> Self {
        Self {
            status: TransformStatus::Failed,
            algorithm,
            bytes_in,
            bytes_out: 0,
            reason: None,
            error: Some(error),
            elapsed,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.status == TransformStatus::Compressed
    }

    pub fn is_pass_through(&self) -> bool {
        self.status == TransformStatus::PassThrough
    }

    /// `bytes_out / bytes_in`, 0.0 for an empty input.
    pub fn ratio(&self) -> f64 {
        ratio(self.bytes_in, self.bytes_out)
    }
}
