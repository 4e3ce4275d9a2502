use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A time or speed field that is empty, non-numeric, non-finite or negative.
    #[error("invalid {field}: {value:?} (expected a non-negative number)")]
    InvalidInput { field: &'static str, value: String },
    #[error("a measurement at time {time} already exists")]
    DuplicateTime { time: f64 },
    #[error("a {kind} is already running")]
    Busy { kind: &'static str },
    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
