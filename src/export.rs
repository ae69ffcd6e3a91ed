use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::error::Result;
use crate::splits::SplitRecord;

#[derive(Debug, Serialize)]
struct SplitRow<'a> {
    split: u32,
    distance_m: f64,
    duration_s: i64,
    pace: String,
    speed_kmh: Option<f64>,
    elevation_delta_m: f64,
    start_time: &'a str,
    end_time: &'a str,
}

/// Write the split table as CSV to any writer.
pub fn write_splits<W: Write>(splits: &[SplitRecord], out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    for split in splits {
        let start = split.start_time.to_rfc3339();
        let end = split.end_time.to_rfc3339();
        wtr.serialize(SplitRow {
            split: split.index,
            distance_m: (split.distance_m * 10.0).round() / 10.0,
            duration_s: split.duration_s,
            pace: split.pace(),
            speed_kmh: split.speed_kmh.map(|s| (s * 100.0).round() / 100.0),
            elevation_delta_m: split.elevation_delta_m,
            start_time: &start,
            end_time: &end,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_splits_csv(splits: &[SplitRecord], output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_splits(splits, file)?;
    tracing::info!(path = %output_path.display(), rows = splits.len(), "split CSV written");
    Ok(())
}
