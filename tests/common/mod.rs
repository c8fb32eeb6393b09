#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use masweep::data::{PricePoint, PriceSource};
use masweep::error::BacktestError;
use masweep::instrument::{Instrument, InstrumentCatalog};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const GOLDEN_CLOSES: [f64; 10] = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0];

pub struct MockPriceSource {
    pub data: HashMap<String, Vec<PricePoint>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, pair: &str, closes: &[f64]) -> Self {
        self.data.insert(pair.to_string(), make_points(closes));
        self
    }
}

impl PriceSource for MockPriceSource {
    fn load(&self, pair: &str, granularity: &str) -> Result<Vec<PricePoint>, BacktestError> {
        self.data
            .get(pair)
            .cloned()
            .ok_or_else(|| BacktestError::SourceNotFound {
                path: format!("his_data_{}_{}.csv", pair, granularity).into(),
            })
    }
}

pub fn make_points(closes: &[f64]) -> Vec<PricePoint> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(start + Duration::minutes(i as i64), c))
        .collect()
}

pub fn make_instrument(name: &str) -> Instrument {
    Instrument::new(
        name.to_string(),
        "CURRENCY".to_string(),
        name.replace('_', "/"),
        -4,
        0.0333,
    )
}

pub fn make_catalog(names: &[&str]) -> InstrumentCatalog {
    InstrumentCatalog::new(names.iter().map(|n| make_instrument(n)).collect()).unwrap()
}

//deterministic wavy series so crossovers happen at every window combination
pub fn wave_closes(len: usize, phase: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = i as f64 / 6.0 + phase;
            1.10 + 0.01 * x.sin() + 0.004 * (x * 2.7).cos()
        })
        .collect()
}

pub fn write_instruments_csv(path: &Path, names: &[&str]) {
    let mut content = String::from("name,type,displayName,pipLocation,marginRate\n");
    for name in names {
        content.push_str(&format!(
            "{},CURRENCY,{},-4,0.0333\n",
            name,
            name.replace('_', "/")
        ));
    }
    fs::write(path, content).unwrap();
}

pub fn write_price_csv(path: &Path, closes: &[f64]) {
    let mut content = String::from("open_time,close_time,open,high,low,close,volume\n");
    for (point, close) in make_points(closes).iter().zip(closes) {
        let open_time = point.timestamp.format("%Y-%m-%d %H:%M:%S+00:00");
        let close_time = (point.timestamp + Duration::seconds(59)).format("%Y-%m-%d %H:%M:%S+00:00");
        content.push_str(&format!(
            "{},{},{},{},{},{},100\n",
            open_time, close_time, close, close, close, close
        ));
    }
    fs::write(path, content).unwrap();
}
