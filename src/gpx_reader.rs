/// GPX point extraction
///
/// Reads the first track segment of a GPX document into `TrackPoint`s.
/// Every point must carry both `<ele>` and `<time>`; a point missing either
/// fails the whole read rather than being skipped.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use gpx::{read, Gpx, Waypoint};

use crate::error::{Result, TrackError};
use crate::track::TrackPoint;

pub fn read_track_points(path: &Path) -> Result<Vec<TrackPoint>> {
    let file = File::open(path)?;
    tracing::debug!(path = %path.display(), "reading GPX");
    parse_track_points(BufReader::new(file))
}

pub fn parse_track_points<R: Read>(reader: R) -> Result<Vec<TrackPoint>> {
    let gpx = read(reader).map_err(|e| TrackError::GpxParse(e.to_string()))?;
    extract_first_segment(&gpx)
}

fn extract_first_segment(gpx: &Gpx) -> Result<Vec<TrackPoint>> {
    let Some(track) = gpx.tracks.first() else {
        tracing::warn!("GPX document has no tracks");
        return Ok(Vec::new());
    };
    let extra_segments = track.segments.len().saturating_sub(1)
        + gpx.tracks.iter().skip(1).map(|t| t.segments.len()).sum::<usize>();
    if extra_segments > 0 {
        tracing::warn!(extra_segments, "only the first track segment is analysed");
    }

    let Some(segment) = track.segments.first() else {
        return Ok(Vec::new());
    };
    segment
        .points
        .iter()
        .enumerate()
        .map(|(i, wpt)| waypoint_to_track_point(i, wpt))
        .collect()
}

fn waypoint_to_track_point(index: usize, wpt: &Waypoint) -> Result<TrackPoint> {
    let elevation = wpt
        .elevation
        .ok_or_else(|| TrackError::MalformedInput(format!("point {} has no <ele>", index)))?;
    let time = wpt
        .time
        .as_ref()
        .ok_or_else(|| TrackError::MalformedInput(format!("point {} has no <time>", index)))?;
    let iso = time
        .format()
        .map_err(|e| TrackError::MalformedInput(format!("point {}: {}", index, e)))?;

    let position = wpt.point();
    TrackPoint::from_raw(position.y(), position.x(), elevation, &iso)
        .map_err(|e| TrackError::MalformedInput(format!("point {}: {}", index, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn gpx_doc(points: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Run</name>
    <trkseg>
{}
    </trkseg>
  </trk>
</gpx>"#,
            points
        )
    }

    const TWO_POINTS: &str = r#"      <trkpt lat="53.3498" lon="-6.2603"><ele>12.0</ele><time>2014-04-01T10:00:00Z</time></trkpt>
      <trkpt lat="53.3507" lon="-6.2603"><ele>14.5</ele><time>2014-04-01T10:00:20Z</time></trkpt>"#;

    #[test]
    fn test_parse_points_in_order() {
        let points = parse_track_points(gpx_doc(TWO_POINTS).as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert!((points[0].position().y() - 53.3498).abs() < 1e-9);
        assert!((points[0].position().x() + 6.2603).abs() < 1e-9);
        assert_eq!(points[1].elevation(), 14.5);
        assert_eq!(
            crate::timestamp::seconds_between(points[0].time(), points[1].time()),
            20
        );
    }

    #[test]
    fn test_millisecond_times_sum_to_elapsed() {
        let doc = gpx_doc(
            r#"      <trkpt lat="0.0" lon="0.0"><ele>0.0</ele><time>2014-04-01T10:00:00.600Z</time></trkpt>
      <trkpt lat="0.0" lon="0.01"><ele>0.0</ele><time>2014-04-01T10:00:01.200Z</time></trkpt>
      <trkpt lat="0.0" lon="0.0101"><ele>0.0</ele><time>2014-04-01T10:00:01.800Z</time></trkpt>"#,
        );
        let points = parse_track_points(doc.as_bytes()).unwrap();
        let analysis = crate::accumulator::TrackAccumulator::new(Default::default())
            .unwrap()
            .analyze(points)
            .unwrap();
        let sum: i64 = analysis.splits.iter().map(|s| s.duration_s).sum();
        assert_eq!(analysis.summary.total_elapsed_s, 1);
        assert_eq!(sum, analysis.summary.total_elapsed_s);
    }

    #[test]
    fn test_missing_elevation_is_malformed() {
        let doc = gpx_doc(
            r#"      <trkpt lat="53.3498" lon="-6.2603"><time>2014-04-01T10:00:00Z</time></trkpt>"#,
        );
        assert!(matches!(
            parse_track_points(doc.as_bytes()),
            Err(TrackError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_missing_time_is_malformed() {
        let doc = gpx_doc(r#"      <trkpt lat="53.3498" lon="-6.2603"><ele>1.0</ele></trkpt>"#);
        assert!(matches!(
            parse_track_points(doc.as_bytes()),
            Err(TrackError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_not_xml_is_parse_error() {
        assert!(matches!(
            parse_track_points("this is not gpx".as_bytes()),
            Err(TrackError::GpxParse(_))
        ));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(gpx_doc(TWO_POINTS).as_bytes()).unwrap();
        let points = read_track_points(file.path()).unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_track_points(Path::new("/definitely/not/here.gpx"));
        assert!(matches!(result, Err(TrackError::Io(_))));
    }
}
