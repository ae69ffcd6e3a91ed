/// Statistics Reporter - whole-track figures and the text report.
use serde::Serialize;

use crate::accumulator::TrackAnalysis;
use crate::splits::SplitRecord;
use crate::timestamp::{clock_time, seconds_between};
use crate::track::TrackPoint;

const RULE: &str = "--------------------------------------------------";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub total_distance_m: f64,
    pub total_elapsed_s: i64,
    /// Minutes per kilometer; `None` for a track that never moved.
    pub average_pace_min_per_km: Option<f64>,
}

impl TrackSummary {
    pub fn from_pass(first: &TrackPoint, last: &TrackPoint, total_distance_m: f64) -> Self {
        let total_elapsed_s = seconds_between(first.time(), last.time());
        TrackSummary {
            total_distance_m,
            total_elapsed_s,
            average_pace_min_per_km: average_pace(total_elapsed_s, total_distance_m),
        }
    }
}

pub fn average_pace(elapsed_s: i64, distance_m: f64) -> Option<f64> {
    if distance_m > 0.0 {
        Some(elapsed_s as f64 / (distance_m / 1000.0) / 60.0)
    } else {
        None
    }
}

fn format_optional(value: Option<f64>, width: usize, precision: usize) -> String {
    match value {
        Some(v) => format!("{:>width$.precision$}", v, width = width, precision = precision),
        None => format!("{:>width$}", "--", width = width),
    }
}

pub fn format_split_row(split: &SplitRecord) -> String {
    format!(
        "{:>6} {:>12} {} {:>11.0}",
        split.index,
        clock_time(split.duration_s),
        format_optional(split.speed_kmh, 11, 2),
        split.elevation_delta_m
    )
}

/// Render the overall statistics followed by the split table.
pub fn render_report(analysis: &TrackAnalysis) -> String {
    let summary = &analysis.summary;
    let mut lines = vec![
        String::new(),
        "-------Overall Statistics-------".to_string(),
        format!("Path Length: {:>5.0} m", summary.total_distance_m),
        format!("Elapsed Time: {} sec", summary.total_elapsed_s),
        format!(
            "Average Pace: {} m/km",
            format_optional(summary.average_pace_min_per_km, 4, 2)
        ),
    ];
    if analysis.non_monotonic {
        lines.push("Warning: timestamps go backwards; some durations are negative".to_string());
    }

    lines.push(String::new());
    lines.push("-------Splits Statistics-------".to_string());
    lines.push(RULE.to_string());
    lines.push(" Split No. | Pace m:s | Speed km/h | Elevation m".to_string());
    lines.push(RULE.to_string());
    lines.extend(analysis.splits.iter().map(format_split_row));
    lines.push(RULE.to_string());
    lines.push("-------Splits Statistics End-------".to_string());

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{AnalysisConfig, TimestampPolicy, TrackAccumulator};
    use crate::error::Result;

    fn analyze_track(points: Vec<TrackPoint>) -> Result<TrackAnalysis> {
        TrackAccumulator::new(AnalysisConfig::default())?.analyze(points)
    }

    fn pt(lat: f64, lon: f64, ele: f64, time: &str) -> TrackPoint {
        TrackPoint::from_raw(lat, lon, ele, time).unwrap()
    }

    #[test]
    fn test_average_pace() {
        // 5 km in 25 minutes
        let pace = average_pace(1500, 5000.0).unwrap();
        assert!((pace - 5.0).abs() < 1e-9);
        assert_eq!(average_pace(30, 0.0), None);
    }

    #[test]
    fn test_summary_uses_first_and_last_point() {
        let first = pt(0.0, 0.0, 0.0, "2014-04-01T10:00:00Z");
        let last = pt(0.0, 0.0, 0.0, "2014-04-01T10:42:10Z");
        let summary = TrackSummary::from_pass(&first, &last, 8400.0);
        assert_eq!(summary.total_elapsed_s, 2530);
        assert!((summary.average_pace_min_per_km.unwrap() - 2530.0 / 8.4 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_row_layout() {
        let t = pt(0.0, 0.0, 0.0, "2014-04-01T10:00:00Z");
        let split = SplitRecord {
            index: 3,
            distance_m: 1003.2,
            duration_s: 301,
            speed_kmh: Some(11.998),
            elevation_delta_m: -4.4,
            start_time: *t.time(),
            end_time: *t.time(),
        };
        assert_eq!(format_split_row(&split), "     3         5:01       12.00          -4");

        let stalled = SplitRecord {
            speed_kmh: None,
            duration_s: 0,
            ..split
        };
        assert_eq!(format_split_row(&stalled), "     3         0:00          --          -4");
    }

    #[test]
    fn test_report_sections_in_order() {
        let analysis = analyze_track(vec![
            pt(0.0, 0.0, 0.0, "2014-04-01T10:00:00Z"),
            pt(0.0, 0.009, 0.0, "2014-04-01T10:01:00Z"),
        ])
        .unwrap();
        let report = render_report(&analysis);

        let length = report.find("Path Length:  1000 m").unwrap();
        let elapsed = report.find("Elapsed Time: 60 sec").unwrap();
        let pace = report.find("Average Pace: 1.00 m/km").unwrap();
        let header = report.find(" Split No. | Pace m:s | Speed km/h | Elevation m").unwrap();
        let row = report.find("     1         1:00       60.01           0").unwrap();
        assert!(length < elapsed && elapsed < pace && pace < header && header < row);
        assert!(report.contains("Overall Statistics"));
        assert!(!report.contains("Warning"));
    }

    #[test]
    fn test_report_for_stationary_track() {
        let analysis = analyze_track(vec![pt(0.0, 0.0, 10.0, "2014-04-01T10:00:00Z")]).unwrap();
        let report = render_report(&analysis);
        assert!(report.contains("Path Length:     0 m"));
        assert!(report.contains("Average Pace:   -- m/km"));
    }

    #[test]
    fn test_report_flags_backwards_timestamps() {
        let accumulator = TrackAccumulator::new(AnalysisConfig {
            timestamp_policy: TimestampPolicy::Allow,
            ..AnalysisConfig::default()
        })
        .unwrap();
        let analysis = accumulator
            .analyze(vec![
                pt(0.0, 0.0, 0.0, "2014-04-01T10:01:40Z"),
                pt(0.0, 0.001, 0.0, "2014-04-01T10:00:50Z"),
            ])
            .unwrap();
        let report = render_report(&analysis);

        let warning = report
            .find("Warning: timestamps go backwards; some durations are negative")
            .unwrap();
        let header = report.find("Split No.").unwrap();
        assert!(warning < header);
        assert!(report.contains("Elapsed Time: -50 sec"));
        assert!(report.contains("     1        -0:50          --           0"));
    }
}
