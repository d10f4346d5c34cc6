use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("dataset is empty, nothing to render")]
    EmptyDataset,
    #[error("device {0} appears more than once in the dataset")]
    DuplicateDevice(String),
    #[error("{metric} IOPS for {device} must be finite and not negative, got {value}")]
    InvalidValue {
        device: String,
        metric: &'static str,
        value: f64,
    },
    #[error("append IOPS for {device} is zero, read/append ratio is undefined")]
    ZeroAppend { device: String },
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),
}
