use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Parse error in {} at line {line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Data format error in {}: {reason}", path.display())]
    DataFormat { path: PathBuf, reason: String },

    #[error("Duplicate instrument name: {0}")]
    DuplicateKey(String),

    #[error("Instrument not found: {0}")]
    NotFound(String),

    #[error("Moving average window {0} was not annotated")]
    MissingWindow(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Pair {pair} failed: {source}")]
    PairFailed {
        pair: String,
        #[source]
        source: Box<BacktestError>,
    },

    #[error("Failed to write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktestError {
    //wraps an error with the pair it happened on
    pub fn for_pair(pair: &str, source: BacktestError) -> Self {
        BacktestError::PairFailed {
            pair: pair.to_string(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, BacktestError>;
