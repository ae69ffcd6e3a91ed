use chrono::{DateTime, SubsecRound, Utc};
use geo::{point, Point};

use crate::error::{Result, TrackError};
use crate::timestamp::parse_utc;

/// One recorded GPS fix.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    position: Point<f64>,
    elevation: f64,
    time: DateTime<Utc>,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: f64, time: DateTime<Utc>) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(TrackError::MalformedInput(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(TrackError::MalformedInput(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        if !elevation.is_finite() {
            return Err(TrackError::MalformedInput(format!(
                "elevation {} is not a finite number",
                elevation
            )));
        }

        Ok(TrackPoint {
            position: point!(x: longitude, y: latitude),
            elevation,
            time: time.trunc_subsecs(0),
        })
    }

    /// Build a point from a raw ISO-8601 time string.
    pub fn from_raw(latitude: f64, longitude: f64, elevation: f64, time: &str) -> Result<Self> {
        Self::new(latitude, longitude, elevation, parse_utc(time)?)
    }

    pub fn position(&self) -> &Point<f64> {
        &self.position
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn time(&self) -> &DateTime<Utc> {
        &self.time
    }
}
