// Error taxonomy for the time series models
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimeSeriesError>;

#[derive(Error, Debug)]
pub enum TimeSeriesError {
    /// Input JSON is malformed, or a field is missing or of the wrong type
    #[error("schema validation failed: {0}")]
    SchemaValidation(#[source] serde_json::Error),

    #[error("failed to serialize to JSON: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Caller supplied an unusable combination of arguments
    #[error("invalid argument: {0}")]
    Argument(String),

    /// A timestamp label could not be interpreted as a datetime
    #[error("cannot convert {value:?} to a datetime: {reason}")]
    Conversion { value: String, reason: String },

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Series being merged do not share one timestamp axis
    #[error("series {name:?} is not aligned with the first series: {reason}")]
    Misaligned { name: String, reason: String },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("cannot {action} text as {encoding}: {reason}")]
    Encoding {
        action: &'static str,
        encoding: &'static str,
        reason: String,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TimeSeriesError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn conversion(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conversion {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
