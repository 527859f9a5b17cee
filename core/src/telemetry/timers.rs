//! telemetry/timers.rs
//! Wall-clock time per engine stage.

use std::fmt;
use std::time::{Duration, Instant};
use std::collections::{HashMap, hash_map};
use serde::{Deserialize, Serialize};

use crate::types::{Direction, TransformResult, TransformStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Codec ran and its compressed output was kept.
    Compress,
    /// Codec ran on the decode path, successful or not.
    Decompress,
    /// Calls that ended as a pass-through copy, fallbacks included.
    PassThrough,
}

impl Stage {
    pub fn of(direction: Direction, result: &TransformResult) -> Stage {
        match (result.status, direction) {
            (TransformStatus::PassThrough, _)  => Stage::PassThrough,
            (_, Direction::Compress)           => Stage::Compress,
            (_, Direction::Decompress)         => Stage::Decompress,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Compress    => "compress",
            Stage::Decompress  => "decompress",
            Stage::PassThrough => "pass_through",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    times: HashMap<Stage, Duration>,
}

impl StageTimes {
    /// Accumulates if the stage is already present.
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_insert(Duration::ZERO) += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or(Duration::ZERO)
    }

    pub fn get_us(&self, stage: Stage) -> f64 {
        self.get(stage).as_secs_f64() * 1_000_000.0
    }

    pub fn total(&self) -> Duration {
        self.times.values().copied().sum()
    }

    pub fn merge(&mut self, other: &StageTimes) {
        for (stage, dur) in other {
            self.add(*stage, *dur);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Stage, &Duration)> {
        self.times.iter()
    }
}

impl<'a> IntoIterator for &'a StageTimes {
    type Item = (&'a Stage, &'a Duration);
    type IntoIter = hash_map::Iter<'a, Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}

#[derive(Clone, Debug)]
pub struct TelemetryTimer {
    pub start_time: Instant,
    pub end_time: Option<Instant>,
    pub stage_times: StageTimes,
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryTimer {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            stage_times: StageTimes::default(),
        }
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    pub fn add_stage_time(&mut self, stage: Stage, dur: Duration) {
        self.stage_times.add(stage, dur);
    }

    /// Attribute the call's elapsed time to its stage.
    pub fn record(&mut self, direction: Direction, result: &TransformResult) {
        self.add_stage_time(Stage::of(direction, result), result.elapsed);
    }

    pub fn elapsed(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }
}
