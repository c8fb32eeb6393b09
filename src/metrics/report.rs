use crate::error::{BacktestError, Result};
use crate::metrics::SweepResult;
use log::info;
use serde::Serialize;
use std::path::Path;

//one row of the persisted sweep report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow<'a> {
    pub pair: &'a str,
    pub num_trades: usize,
    pub total_gain: f64,
    pub mean_gain: Option<f64>,
    pub min_gain: Option<f64>,
    pub max_gain: Option<f64>,
    pub mashort: usize,
    pub malong: usize,
}

impl<'a> From<&'a SweepResult> for ReportRow<'a> {
    fn from(result: &'a SweepResult) -> Self {
        ReportRow {
            pair: &result.pair,
            num_trades: result.num_trades,
            total_gain: result.total_gain,
            mean_gain: result.mean_gain,
            min_gain: result.min_gain,
            max_gain: result.max_gain,
            mashort: result.ma_short,
            malong: result.ma_long,
        }
    }
}

//writes one row per combination, absent aggregates as empty cells
pub fn write_report<P: AsRef<Path>>(results: &[SweepResult], path: P) -> Result<()> {
    let path = path.as_ref();
    let report_error = |source: csv::Error| BacktestError::Report {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(report_error)?;

    if results.is_empty() {
        //serde only emits headers with the first row
        writer
            .write_record([
                "pair",
                "num_trades",
                "total_gain",
                "mean_gain",
                "min_gain",
                "max_gain",
                "mashort",
                "malong",
            ])
            .map_err(report_error)?;
    }

    for result in results {
        writer
            .serialize(ReportRow::from(result))
            .map_err(report_error)?;
    }

    writer.flush()?;

    info!("Wrote {} result rows to {:?}", results.len(), path);

    Ok(())
}
