/// Track Accumulator - one forward pass over the points, keeping running
/// total distance and handing each step to the split segmenter.
use crate::error::{Result, TrackError};
use crate::geodesy::point_distance_m;
use crate::splits::{SplitRecord, SplitSegmenter, DEFAULT_SPLIT_DISTANCE_M};
use crate::summary::TrackSummary;
use crate::track::TrackPoint;

/// What to do when a point is timestamped earlier than the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Abort the analysis with `NonMonotonicTimestamp`.
    #[default]
    Reject,
    /// Keep going; affected splits carry negative durations.
    Allow,
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub split_distance_m: f64,
    pub timestamp_policy: TimestampPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            split_distance_m: DEFAULT_SPLIT_DISTANCE_M,
            timestamp_policy: TimestampPolicy::Reject,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.split_distance_m.is_finite() || self.split_distance_m <= 0.0 {
            return Err(TrackError::InvalidConfig(format!(
                "split distance must be a positive number of meters, got {}",
                self.split_distance_m
            )));
        }
        Ok(())
    }
}

/// Everything a single pass produces.
#[derive(Debug, Clone)]
pub struct TrackAnalysis {
    pub points: Vec<TrackPoint>,
    pub splits: Vec<SplitRecord>,
    pub summary: TrackSummary,
    /// Set when `TimestampPolicy::Allow` let a backwards timestamp through.
    pub non_monotonic: bool,
}

pub struct TrackAccumulator {
    config: AnalysisConfig,
}

impl TrackAccumulator {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(TrackAccumulator { config })
    }

    /// Consume the points in order and produce splits plus the summary.
    pub fn analyze(&self, points: Vec<TrackPoint>) -> Result<TrackAnalysis> {
        let first = points.first().ok_or(TrackError::EmptyTrack)?;
        let non_monotonic = self.check_timestamps(&points)?;

        let mut segmenter = SplitSegmenter::new(self.config.split_distance_m, first);
        let mut total_distance_m = 0.0;
        let last_index = points.len() - 1;

        for (i, pair) in points.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let step_m = point_distance_m(previous.position(), current.position());
            total_distance_m += step_m;

            if let Some(split) = segmenter.advance(step_m, current, i + 1 == last_index) {
                tracing::debug!(
                    index = split.index,
                    distance_m = split.distance_m,
                    duration_s = split.duration_s,
                    "split closed"
                );
            }
        }

        let summary = TrackSummary::from_pass(first, &points[last_index], total_distance_m);
        let splits = segmenter.into_splits();
        tracing::info!(
            points = points.len(),
            splits = splits.len(),
            total_distance_m = summary.total_distance_m,
            elapsed_s = summary.total_elapsed_s,
            "track analysed"
        );

        Ok(TrackAnalysis {
            points,
            splits,
            summary,
            non_monotonic,
        })
    }

    /// Returns whether any timestamp goes backwards; errors if the policy forbids it.
    fn check_timestamps(&self, points: &[TrackPoint]) -> Result<bool> {
        let mut found = false;
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].time() >= pair[0].time() {
                continue;
            }
            match self.config.timestamp_policy {
                TimestampPolicy::Reject => {
                    return Err(TrackError::NonMonotonicTimestamp {
                        index: i + 1,
                        previous: pair[0].time().to_rfc3339(),
                        current: pair[1].time().to_rfc3339(),
                    });
                }
                TimestampPolicy::Allow => {
                    tracing::warn!(index = i + 1, "timestamp goes backwards, durations may be negative");
                    found = true;
                }
            }
        }
        Ok(found)
    }
}
