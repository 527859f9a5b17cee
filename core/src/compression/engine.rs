//! compression/engine.rs
//! Orchestrates backend selection, the shrink/fallback policy and
//! all-or-nothing output for every call.
//!
//! Summary:
//! - `compress` never fails: the output ends up holding either codec output
//!   (`Compressed`) or a segment-sharing copy of the input (`PassThrough`).
//! - `decompress` has no fallback: codec errors are returned unchanged and
//!   the output buffer is restored to its pre-call state.
//! - Each call builds its own codec context, so one engine can be shared by
//!   any number of threads without locking.

use std::sync::Arc;
use std::time::Instant;
use once_cell::sync::Lazy;

use crate::buffer::{HeapAllocator, OutputTransaction, SegmentAllocator, SegmentedBuffer};
use crate::compression::codecs::IdentityCodec;
use crate::compression::registry::{create_compressor, create_decompressor};
use crate::compression::report::{ErrorReporter, FailureEvent, TracingReporter, LOG_TARGET};
use crate::compression::types::{CompressionAlgorithm, CompressionError};
use crate::config::{ConfigError, EngineConfig};
use crate::types::{Direction, PassThroughReason, TransformResult};

#[derive(Debug, Clone)]
pub struct CompressionEngine {
    config: EngineConfig,
    allocator: Arc<dyn SegmentAllocator>,
    reporter: Arc<dyn ErrorReporter>,
}

impl Default for CompressionEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            allocator: Arc::new(HeapAllocator),
            reporter: Arc::new(TracingReporter),
        }
    }
}

impl CompressionEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    pub fn with_allocator(mut self, allocator: Arc<dyn SegmentAllocator>) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Append `input` to `output` in compressed form, or as a pass-through copy
    /// when the algorithm is `None`, the policy skips or rejects the result,
    /// or the codec fails. Codec output is rolled back before the copy runs.
    pub fn compress(
        &self,
        algorithm: CompressionAlgorithm,
        input: &SegmentedBuffer,
        output: &mut SegmentedBuffer,
    ) -> TransformResult {
        let start = Instant::now();
        let bytes_in = input.total_length();

        let reason = if !algorithm.is_codec() {
            PassThroughReason::Identity
        } else if input.is_empty() {
            PassThroughReason::EmptyInput
        } else if self.config.policy_for(algorithm).is_some_and(|p| !p.admits(bytes_in)) {
            PassThroughReason::BelowThreshold
        } else {
            match self.try_compress(algorithm, input, output) {
                Ok(bytes_out) => {
                    let result = TransformResult::compressed(algorithm, bytes_in, bytes_out, start.elapsed());
                    tracing::trace!(
                        target: LOG_TARGET,
                        algorithm = %algorithm,
                        bytes_in,
                        bytes_out,
                        "compressed"
                    );
                    return result;
                }
                Err((error, released_segments)) => {
                    self.reporter.report(&FailureEvent {
                        direction: Direction::Compress,
                        algorithm,
                        error: &error,
                        bytes_in,
                        released_segments,
                    });
                    PassThroughReason::Fallback(error.kind())
                }
            }
        };

        IdentityCodec::transform(input, output);
        tracing::trace!(target: LOG_TARGET, algorithm = %algorithm, bytes_in, reason = ?reason, "passed through");
        TransformResult::pass_through(algorithm, bytes_in, reason, start.elapsed())
    }

    // Err carries the number of output segments released by rollback.
    fn try_compress(
        &self,
        algorithm: CompressionAlgorithm,
        input: &SegmentedBuffer,
        output: &mut SegmentedBuffer,
    ) -> Result<usize, (CompressionError, usize)> {
        let compressor = create_compressor(algorithm, &self.config, &self.allocator).map_err(|e| (e, 0))?;

        let mut tx = OutputTransaction::begin(output);
        let outcome = compressor.compress(input, &mut tx).and_then(|()| {
            match self.config.policy_for(algorithm) {
                Some(policy) => policy.check(input.total_length(), tx.appended_len()),
                None => Ok(()),
            }
        });

        match outcome {
            Ok(()) => Ok(tx.commit()),
            Err(error) => Err((error, tx.rollback())),
        }
    }

    /// Append the decoded form of `input` to `output`. Any codec failure is
    /// returned unchanged and leaves `output` exactly as it was.
    pub fn decompress(
        &self,
        algorithm: CompressionAlgorithm,
        input: &SegmentedBuffer,
        output: &mut SegmentedBuffer,
    ) -> Result<TransformResult, CompressionError> {
        let start = Instant::now();
        let bytes_in = input.total_length();

        if !algorithm.is_codec() {
            IdentityCodec::transform(input, output);
            return Ok(TransformResult::pass_through(algorithm, bytes_in, PassThroughReason::Identity, start.elapsed()));
        }
        if input.is_empty() {
            return Ok(TransformResult::pass_through(algorithm, 0, PassThroughReason::EmptyInput, start.elapsed()));
        }

        let decompressor = create_decompressor(algorithm, &self.config, &self.allocator)
            .map_err(|error| self.report_decompress(algorithm, error, bytes_in, 0))?;

        let mut tx = OutputTransaction::begin(output);
        match decompressor.decompress(input, &mut tx) {
            Ok(()) => {
                let bytes_out = tx.commit();
                tracing::trace!(target: LOG_TARGET, algorithm = %algorithm, bytes_in, bytes_out, "decompressed");
                Ok(TransformResult::compressed(algorithm, bytes_in, bytes_out, start.elapsed()))
            }
            Err(error) => {
                let released = tx.rollback();
                Err(self.report_decompress(algorithm, error, bytes_in, released))
            }
        }
    }

    fn report_decompress(
        &self,
        algorithm: CompressionAlgorithm,
        error: CompressionError,
        bytes_in: usize,
        released_segments: usize,
    ) -> CompressionError {
        self.reporter.report(&FailureEvent {
            direction: Direction::Decompress,
            algorithm,
            error: &error,
            bytes_in,
            released_segments,
        });
        error
    }

    /// `compress` for a raw selector. Out-of-range values are rejected
    /// before `output` is touched.
    pub fn compress_raw(
        &self,
        raw: u8,
        input: &SegmentedBuffer,
        output: &mut SegmentedBuffer,
    ) -> Result<TransformResult, CompressionError> {
        let algorithm = CompressionAlgorithm::from_raw(raw)?;
        Ok(self.compress(algorithm, input, output))
    }

    /// `decompress` for a raw selector.
    pub fn decompress_raw(
        &self,
        raw: u8,
        input: &SegmentedBuffer,
        output: &mut SegmentedBuffer,
    ) -> Result<TransformResult, CompressionError> {
        let algorithm = CompressionAlgorithm::from_raw(raw)?;
        self.decompress(algorithm, input, output)
    }
}

static DEFAULT_ENGINE: Lazy<CompressionEngine> = Lazy::new(CompressionEngine::default);

/// `CompressionEngine::compress` on a process-wide engine with default config.
pub fn compress(
    algorithm: CompressionAlgorithm,
    input: &SegmentedBuffer,
    output: &mut SegmentedBuffer,
) -> TransformResult {
    DEFAULT_ENGINE.compress(algorithm, input, output)
}

/// `CompressionEngine::decompress` on a process-wide engine with default config.
pub fn decompress(
    algorithm: CompressionAlgorithm,
    input: &SegmentedBuffer,
    output: &mut SegmentedBuffer,
) -> Result<TransformResult, CompressionError> {
    DEFAULT_ENGINE.decompress(algorithm, input, output)
}
