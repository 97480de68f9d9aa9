use thiserror::Error;

/// Domain errors of the data and query layers.
///
/// Loader and application plumbing wrap these in `anyhow::Error` with
/// additional context (file name, row number).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Unknown metric selector: {0:?}")]
    UnknownMetric(String),

    #[error("Unknown room bucket (WGM): {0:?}")]
    UnknownRoomBucket(String),

    #[error("Invalid value in column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },
}
