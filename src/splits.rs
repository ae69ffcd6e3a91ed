/// Split Segmenter - closes fixed-distance splits and records pace, speed
/// and elevation change for each one.
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::timestamp::seconds_between;
use crate::track::TrackPoint;

pub const DEFAULT_SPLIT_DISTANCE_M: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitRecord {
    pub index: u32,
    pub distance_m: f64,
    pub duration_s: i64,
    /// `None` when the split took no (or negative) time.
    pub speed_kmh: Option<f64>,
    pub elevation_delta_m: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SplitRecord {
    pub fn pace(&self) -> String {
        crate::timestamp::clock_time(self.duration_s)
    }
}

/// km/h from meters and seconds, undefined for non-positive durations.
pub fn speed_kmh(distance_m: f64, duration_s: i64) -> Option<f64> {
    if duration_s > 0 {
        Some(distance_m * 3.6 / duration_s as f64)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
struct SplitStart {
    time: DateTime<Utc>,
    elevation: f64,
}

#[derive(Debug)]
pub struct SplitSegmenter {
    threshold_m: f64,
    split_distance_m: f64,
    start: SplitStart,
    splits: Vec<SplitRecord>,
}

impl SplitSegmenter {
    /// Start the first split at `first`.
    pub fn new(threshold_m: f64, first: &TrackPoint) -> Self {
        SplitSegmenter {
            threshold_m,
            split_distance_m: 0.0,
            start: SplitStart {
                time: *first.time(),
                elevation: first.elevation(),
            },
            splits: Vec::new(),
        }
    }

    /// Add the distance covered up to `current` and close the split when the
    /// threshold is reached or `is_last` is set. Returns the closed split.
    pub fn advance(&mut self, step_m: f64, current: &TrackPoint, is_last: bool) -> Option<&SplitRecord> {
        self.split_distance_m += step_m;
        if self.split_distance_m < self.threshold_m && !is_last {
            return None;
        }

        let duration_s = seconds_between(&self.start.time, current.time());
        let record = SplitRecord {
            index: self.splits.len() as u32 + 1,
            distance_m: self.split_distance_m,
            duration_s,
            speed_kmh: speed_kmh(self.split_distance_m, duration_s),
            elevation_delta_m: current.elevation() - self.start.elevation,
            start_time: self.start.time,
            end_time: *current.time(),
        };
        if record.speed_kmh.is_none() {
            tracing::debug!(index = record.index, duration_s, "split speed undefined");
        }

        self.splits.push(record);
        self.split_distance_m = 0.0;
        self.start = SplitStart {
            time: *current.time(),
            elevation: current.elevation(),
        };
        self.splits.last()
    }

    pub fn into_splits(self) -> Vec<SplitRecord> {
        self.splits
    }
}
