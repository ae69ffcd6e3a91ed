/// Batch analysis of every GPX file under a folder.
///
/// Files are analysed in parallel; each file is still a single sequential
/// pass. A file that fails to read or analyse becomes an error row instead
/// of stopping the batch.
use std::path::{Path, PathBuf};

use csv::Writer;
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::accumulator::{AnalysisConfig, TrackAccumulator};
use crate::error::Result;
use crate::gpx_reader::read_track_points;

#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub filename: String,
    pub points: usize,
    pub splits: usize,
    pub total_distance_m: f64,
    pub total_elapsed_s: i64,
    pub average_pace_min_per_km: Option<f64>,
    pub fastest_split_kmh: Option<f64>,
    pub status: String,
}

impl BatchRow {
    fn failed(filename: String, error: String) -> Self {
        BatchRow {
            filename,
            points: 0,
            splits: 0,
            total_distance_m: 0.0,
            total_elapsed_s: 0,
            average_pace_min_per_km: None,
            fastest_split_kmh: None,
            status: format!("ERROR: {}", error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

pub fn find_gpx_files(folder: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .map(|s| s.eq_ignore_ascii_case("gpx"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn analyze_file(path: &Path, accumulator: &TrackAccumulator) -> BatchRow {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let analysis = match read_track_points(path).and_then(|points| accumulator.analyze(points)) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(file = %filename, error = %e, "skipping file");
            return BatchRow::failed(filename, e.to_string());
        }
    };

    let fastest_split_kmh = analysis
        .splits
        .iter()
        .filter_map(|s| s.speed_kmh)
        .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));

    BatchRow {
        filename,
        points: analysis.points.len(),
        splits: analysis.splits.len(),
        total_distance_m: analysis.summary.total_distance_m,
        total_elapsed_s: analysis.summary.total_elapsed_s,
        average_pace_min_per_km: analysis.summary.average_pace_min_per_km,
        fastest_split_kmh,
        status: "OK".to_string(),
    }
}

/// Analyse every `.gpx` file under `folder`, sorted by path.
pub fn analyze_folder(folder: &Path, config: AnalysisConfig) -> Result<Vec<BatchRow>> {
    let accumulator = TrackAccumulator::new(config)?;
    let files = find_gpx_files(folder);
    tracing::info!(folder = %folder.display(), files = files.len(), "found GPX files");

    let rows: Vec<BatchRow> = files
        .par_iter()
        .map(|path| analyze_file(path, &accumulator))
        .collect();

    let failed = rows.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(processed = rows.len() - failed, failed, "batch complete");
    Ok(rows)
}

pub fn write_batch_csv(rows: &[BatchRow], output_path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(output_path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
