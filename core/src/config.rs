//! config.rs
//! Engine configuration: scratch sizes, levels, limits and per-algorithm policy.
use serde::{Deserialize, Serialize};

use crate::compression::{CompressionAlgorithm, CompressionPolicy, PolicyTable};
use crate::constants::{
    DEFAULT_DEFLATE_LEVEL, DEFAULT_LZ4_COALESCE_THRESHOLD, DEFAULT_LZ4_LEVEL, DEFAULT_WINDOW_SIZE,
    MAX_DEFLATE_LEVEL, MAX_LZ4_COALESCE_THRESHOLD, MAX_LZ4_LEVEL, MAX_WINDOW_SIZE,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {msg}")]
    Invalid { field: &'static str, msg: String },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// zlib-family scratch window; also the size of every full output segment.
    pub window_size: usize,

    /// 0..=9 for DEFLATE and GZIP.
    pub deflate_level: u32,

    /// LZ4 frame compression level (0 = fast).
    pub lz4_level: u32,

    /// Decoded LZ4 output is batched up to this many bytes per segment.
    /// 0 emits every decoded step as its own segment.
    pub lz4_coalesce_threshold: usize,

    /// Upper bound on decompressed bytes per call.
    pub max_decompressed_len: Option<usize>,

    pub policies: PolicyTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            deflate_level: DEFAULT_DEFLATE_LEVEL,
            lz4_level: DEFAULT_LZ4_LEVEL,
            lz4_coalesce_threshold: DEFAULT_LZ4_COALESCE_THRESHOLD,
            max_decompressed_len: None,
            policies: PolicyTable::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::Invalid { field: "window_size", msg: "must be non-zero".into() });
        }
        if self.window_size > MAX_WINDOW_SIZE {
            return Err(ConfigError::Invalid {
                field: "window_size",
                msg: format!("{} > {}", self.window_size, MAX_WINDOW_SIZE),
            });
        }
        if self.lz4_coalesce_threshold > MAX_LZ4_COALESCE_THRESHOLD {
            return Err(ConfigError::Invalid {
                field: "lz4_coalesce_threshold",
                msg: format!("{} > {}", self.lz4_coalesce_threshold, MAX_LZ4_COALESCE_THRESHOLD),
            });
        }
        if self.deflate_level > MAX_DEFLATE_LEVEL {
            return Err(ConfigError::Invalid {
                field: "deflate_level",
                msg: format!("{} > {}", self.deflate_level, MAX_DEFLATE_LEVEL),
            });
        }
        if self.lz4_level > MAX_LZ4_LEVEL {
            return Err(ConfigError::Invalid {
                field: "lz4_level",
                msg: format!("{} > {}", self.lz4_level, MAX_LZ4_LEVEL),
            });
        }
        Ok(())
    }

    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn policy_for(&self, algorithm: CompressionAlgorithm) -> Option<&CompressionPolicy> {
        self.policies.for_algorithm(algorithm)
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_deflate_level(mut self, level: u32) -> Self {
        self.deflate_level = level;
        self
    }

    pub fn with_lz4_level(mut self, level: u32) -> Self {
        self.lz4_level = level;
        self
    }

    pub fn with_lz4_coalesce_threshold(mut self, threshold: usize) -> Self {
        self.lz4_coalesce_threshold = threshold;
        self
    }

    pub fn with_max_decompressed_len(mut self, limit: usize) -> Self {
        self.max_decompressed_len = Some(limit);
        self
    }

    pub fn with_policy(mut self, algorithm: CompressionAlgorithm, policy: CompressionPolicy) -> Self {
        self.policies.set(algorithm, policy);
        self
    }
}
