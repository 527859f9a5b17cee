//! compression/report.rs
//! Classifies and surfaces backend failures without aborting the caller.
//!
//! Compression failures are expected (the payload goes out uncompressed) and
//! are logged at debug level. Decompression failures end processing of that
//! message and are logged as warnings.

use std::fmt;
use std::sync::Mutex;

use crate::compression::types::{CompressionAlgorithm, CompressionError, ErrorKind};
use crate::types::Direction;

pub const LOG_TARGET: &str = "message_compress";

/// One failed codec call as seen by the engine.
#[derive(Debug)]
pub struct FailureEvent<'a> {
    pub direction: Direction,
    pub algorithm: CompressionAlgorithm,
    pub error: &'a CompressionError,
    pub bytes_in: usize,
    /// Output segments released by rollback.
    pub released_segments: usize,
}

impl FailureEvent<'_> {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

pub trait ErrorReporter: Send + Sync + fmt::Debug {
    fn report(&self, event: &FailureEvent<'_>);
}

/// Default reporter: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, event: &FailureEvent<'_>) {
        match event.direction {
            Direction::Compress => tracing::debug!(
                target: LOG_TARGET,
                algorithm = %event.algorithm,
                kind = %event.kind(),
                error = %event.error,
                bytes_in = event.bytes_in,
                released_segments = event.released_segments,
                "compression fell back to pass-through"
            ),
            Direction::Decompress => tracing::warn!(
                target: LOG_TARGET,
                algorithm = %event.algorithm,
                kind = %event.kind(),
                error = %event.error,
                bytes_in = event.bytes_in,
                released_segments = event.released_segments,
                "decompression failed"
            ),
        }
    }
}

/// Owned copy of a reported failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportedFailure {
    pub direction: Direction,
    pub algorithm: CompressionAlgorithm,
    pub kind: ErrorKind,
    pub message: String,
    pub released_segments: usize,
}

/// Keeps every reported failure in memory, then forwards to `tracing`.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportedFailure>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportedFailure> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.events().iter().filter(|e| e.kind == kind).count()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, event: &FailureEvent<'_>) {
        let record = ReportedFailure {
            direction: event.direction,
            algorithm: event.algorithm,
            kind: event.kind(),
            message: event.error.to_string(),
            released_segments: event.released_segments,
        };
        match self.events.lock() {
            Ok(mut events) => events.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        TracingReporter.report(event);
    }
}
