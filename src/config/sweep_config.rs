use crate::engine::combinations;
use crate::error::{BacktestError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//what to do when one pair's pipeline fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    //abort the whole sweep on the first failing pair
    FailFast,
    //record the failure and keep going with the other pairs
    Isolate,
}

impl FailurePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fail_fast" | "fail-fast" | "failfast" => Some(FailurePolicy::FailFast),
            "isolate" => Some(FailurePolicy::Isolate),
            _ => None,
        }
    }
}

//unit that trade deltas and gains are reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainUnit {
    //raw close price difference
    Price,
    //price difference divided by the instrument's pip scale
    Pips,
}

impl GainUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "price" => Some(GainUnit::Price),
            "pip" | "pips" => Some(GainUnit::Pips),
            _ => None,
        }
    }
}

//complete sweep configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfiguration {
    //currencies used to build pair names
    pub currencies: Vec<String>,
    pub granularity: String,

    //moving average windows
    pub ma_short: Vec<usize>,
    pub ma_long: Vec<usize>,

    //inputs
    pub data_dir: PathBuf,
    pub instruments_path: PathBuf,

    //output
    pub output_path: PathBuf,

    //sweep behaviour
    pub failure_policy: FailurePolicy,
    pub include_self_pairs: bool,
    pub parallel: bool,
    pub gain_unit: GainUnit,
}

impl Default for SweepConfiguration {
    fn default() -> Self {
        SweepConfiguration {
            currencies: vec!["BTC".to_string(), "USD".to_string(), "ETH".to_string()],
            granularity: "1m".to_string(),
            ma_short: vec![8, 10, 12],
            ma_long: vec![21, 34, 55],
            data_dir: PathBuf::from("data"),
            instruments_path: PathBuf::from("instruments.csv"),
            output_path: PathBuf::from("ma_test_res.csv"),
            failure_policy: FailurePolicy::Isolate,
            include_self_pairs: false,
            parallel: true,
            gain_unit: GainUnit::Price,
        }
    }
}

impl SweepConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file {:?}", path))?;
        let config: SweepConfiguration = serde_json::from_str(&contents)
            .context(format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).context(format!("Failed to write config file {:?}", path))?;
        Ok(())
    }

    //checks the parameters a sweep cannot run without
    pub fn validate(&self) -> Result<()> {
        if self.granularity.trim().is_empty() {
            return Err(BacktestError::InvalidConfig(
                "granularity must not be empty".to_string(),
            ));
        }
        if self.ma_short.is_empty() || self.ma_long.is_empty() {
            return Err(BacktestError::InvalidConfig(
                "ma_short and ma_long must each list at least one window".to_string(),
            ));
        }
        if self.ma_short.iter().chain(self.ma_long.iter()).any(|&w| w == 0) {
            return Err(BacktestError::InvalidConfig(
                "moving average windows must be greater than zero".to_string(),
            ));
        }
        if combinations(&self.ma_short, &self.ma_long).is_empty() {
            return Err(BacktestError::InvalidConfig(
                "no ma_short < ma_long combination".to_string(),
            ));
        }
        Ok(())
    }

    //path of the historical price file for a pair
    pub fn price_data_path(&self, pair: &str) -> PathBuf {
        price_data_path(&self.data_dir, pair, &self.granularity)
    }
}

//data/his_data_{pair}_{granularity}.csv
pub fn price_data_path(data_dir: &Path, pair: &str, granularity: &str) -> PathBuf {
    data_dir.join(format!("his_data_{}_{}.csv", pair, granularity))
}

//splits a comma separated currency list ("BTC, usd,ETH")
pub fn parse_currencies(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}
