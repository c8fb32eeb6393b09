use crate::config::price_data_path;
use crate::data::price::{parse_timestamp, PricePoint};
use crate::error::{BacktestError, Result};
use csv::ReaderBuilder;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const REQUIRED_COLUMNS: [&str; 2] = ["open_time", "close"];

#[derive(Debug, Deserialize)]
struct CsvRecord {
    open_time: String,
    close: f64,

    //coerced so malformed rows are rejected, but not consumed
    #[serde(default)]
    #[allow(dead_code)]
    open: Option<f64>,
    #[serde(default)]
    #[allow(dead_code)]
    high: Option<f64>,
    #[serde(default)]
    #[allow(dead_code)]
    low: Option<f64>,
}

//loads (open_time, close) points from a historical price csv, sorted by timestamp
pub fn load_prices<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(BacktestError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| BacktestError::DataFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let headers = reader
        .headers()
        .map_err(|e| BacktestError::DataFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(BacktestError::DataFormat {
                path: path.to_path_buf(),
                reason: format!("missing required column '{}'", column),
            });
        }
    }

    let mut points = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let line = index as u64 + 2;
        let parse_error = |reason: String| BacktestError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let record: CsvRecord = result.map_err(|e| parse_error(e.to_string()))?;

        let timestamp = parse_timestamp(&record.open_time)
            .ok_or_else(|| parse_error(format!("invalid timestamp '{}'", record.open_time)))?;

        if !record.close.is_finite() {
            return Err(parse_error(format!("non-finite close {}", record.close)));
        }

        points.push(PricePoint::new(timestamp, record.close));
    }

    //stable sort keeps file order for equal timestamps
    points.sort_by_key(|p| p.timestamp);

    debug!("Loaded {} price points from {:?}", points.len(), path);

    Ok(points)
}

//source of price series for a pair at a granularity
pub trait PriceSource: Sync {
    fn load(&self, pair: &str, granularity: &str) -> Result<Vec<PricePoint>>;
}

//reads data/his_data_{pair}_{granularity}.csv files
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    data_dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        CsvPriceSource {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, pair: &str, granularity: &str) -> PathBuf {
        price_data_path(&self.data_dir, pair, granularity)
    }
}

impl PriceSource for CsvPriceSource {
    fn load(&self, pair: &str, granularity: &str) -> Result<Vec<PricePoint>> {
        load_prices(self.path_for(pair, granularity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "open_time,close_time,open,high,low,close,volume\n";

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_and_sorts_by_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "prices.csv",
            &format!(
                "{}2024-01-01 00:02:00+00:00,2024-01-01 00:02:59+00:00,1.0,1.2,0.9,1.1,10\n\
                 2024-01-01 00:00:00+00:00,2024-01-01 00:00:59+00:00,1.0,1.2,0.9,1.0,10\n\
                 2024-01-01 00:01:00+00:00,2024-01-01 00:01:59+00:00,1.0,1.2,0.9,1.05,10\n",
                HEADER
            ),
        );

        let points = load_prices(&path).unwrap();
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![1.0, 1.05, 1.1]);
        assert!(points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn only_open_time_and_close_are_required() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "minimal.csv",
            "open_time,close\n1704067200000,42000.5\n",
        );

        let points = load_prices(&path).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 42000.5);
        assert_eq!(points[0].timestamp.timestamp_millis(), 1704067200000);
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = TempDir::new().unwrap();
        let source = CsvPriceSource::new(dir.path());
        match source.load("EUR_USD", "M5") {
            Err(BacktestError::SourceNotFound { path }) => {
                assert!(path.ends_with("his_data_EUR_USD_M5.csv"))
            }
            other => panic!("expected SourceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn malformed_close_is_parse_error_with_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "bad.csv",
            &format!(
                "{}2024-01-01 00:00:00+00:00,x,1.0,1.2,0.9,1.0,10\n\
                 2024-01-01 00:01:00+00:00,x,1.0,1.2,0.9,abc,10\n",
                HEADER
            ),
        );

        match load_prices(&path) {
            Err(BacktestError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn malformed_timestamp_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad_ts.csv", "open_time,close\nnot-a-date,1.0\n");
        assert!(matches!(
            load_prices(&path),
            Err(BacktestError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn nan_close_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "nan.csv", "open_time,close\n2024-01-01T00:00:00Z,NaN\n");
        assert!(matches!(load_prices(&path), Err(BacktestError::Parse { .. })));
    }

    #[test]
    fn missing_close_column_is_data_format_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "no_close.csv", "open_time,open\n2024-01-01T00:00:00Z,1.0\n");
        assert!(matches!(
            load_prices(&path),
            Err(BacktestError::DataFormat { .. })
        ));
    }
}
