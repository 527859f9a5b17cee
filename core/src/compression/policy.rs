//! compression/policy.rs
//! Per-algorithm acceptance rules for compressed output.
use serde::{Deserialize, Serialize};

use crate::compression::types::{CompressionAlgorithm, CompressionError};

/// When to attempt compression and when to keep its result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionPolicy {
    /// Inputs shorter than this are passed through without running the codec.
    pub min_input_len: usize,
    /// Keep compressed output only if strictly smaller than the input.
    pub require_shrink: bool,
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self { min_input_len: 0, require_shrink: true }
    }
}

impl CompressionPolicy {
    pub fn new(min_input_len: usize, require_shrink: bool) -> Self {
        Self { min_input_len, require_shrink }
    }

    /// Always keep codec output, whatever its size.
    pub fn accept_all() -> Self {
        Self { min_input_len: 0, require_shrink: false }
    }

    pub fn admits(&self, input_len: usize) -> bool {
        input_len >= self.min_input_len
    }

    pub fn check(&self, input_len: usize, output_len: usize) -> Result<(), CompressionError> {
        if self.require_shrink && output_len >= input_len {
            return Err(CompressionError::ShrinkPolicyNotMet { input_len, output_len });
        }
        Ok(())
    }
}

/// One policy per real codec. `None` has no policy: it always passes through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTable {
    pub deflate: CompressionPolicy,
    pub gzip: CompressionPolicy,
    pub lz4: CompressionPolicy,
}

impl PolicyTable {
    /// Same policy for every codec.
    pub fn uniform(policy: CompressionPolicy) -> Self {
        Self { deflate: policy, gzip: policy, lz4: policy }
    }

    pub fn for_algorithm(&self, algorithm: CompressionAlgorithm) -> Option<&CompressionPolicy> {
        match algorithm {
            CompressionAlgorithm::None    => None,
            CompressionAlgorithm::Deflate => Some(&self.deflate),
            CompressionAlgorithm::Gzip    => Some(&self.gzip),
            CompressionAlgorithm::Lz4     => Some(&self.lz4),
        }
    }

    pub fn set(&mut self, algorithm: CompressionAlgorithm, policy: CompressionPolicy) {
        match algorithm {
            CompressionAlgorithm::None    => {}
            CompressionAlgorithm::Deflate => self.deflate = policy,
            CompressionAlgorithm::Gzip    => self.gzip = policy,
            CompressionAlgorithm::Lz4     => self.lz4 = policy,
        }
    }
}
