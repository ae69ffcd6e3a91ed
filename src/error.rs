use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("malformed track point: {0}")]
    MalformedInput(String),
    #[error("insufficient data: track contains no points")]
    EmptyTrack,
    #[error("timestamp of point {index} ({current}) is earlier than its predecessor ({previous})")]
    NonMonotonicTimestamp {
        index: usize,
        previous: String,
        current: String,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse GPX file: {0}")]
    GpxParse(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
