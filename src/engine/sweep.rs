use crate::config::{FailurePolicy, GainUnit, SweepConfiguration};
use crate::data::PriceSource;
use crate::error::{BacktestError, Result};
use crate::instrument::{Instrument, InstrumentCatalog};
use crate::metrics::SweepResult;
use crate::strategy::{
    annotate, detect_crossovers, evaluate, evaluate_scaled, ma_column, sweep_windows,
    AnnotatedSeries,
};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

//parameters the sweep engine needs, taken from the full configuration
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub granularity: String,
    pub ma_short: Vec<usize>,
    pub ma_long: Vec<usize>,
    pub failure_policy: FailurePolicy,
    pub parallel: bool,
    pub gain_unit: GainUnit,
}

impl From<&SweepConfiguration> for SweepConfig {
    fn from(config: &SweepConfiguration) -> Self {
        SweepConfig {
            granularity: config.granularity.clone(),
            ma_short: config.ma_short.clone(),
            ma_long: config.ma_long.clone(),
            failure_policy: config.failure_policy,
            parallel: config.parallel,
            gain_unit: config.gain_unit,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig::from(&SweepConfiguration::default())
    }
}

//a pair whose pipeline failed under the isolate policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFailure {
    pub pair: String,
    pub reason: String,
}

//result of a sweep
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    //sorted by pair, then ma_short, then ma_long
    pub results: Vec<SweepResult>,
    pub failures: Vec<PairFailure>,
}

impl SweepReport {
    pub fn total_trades(&self) -> usize {
        crate::metrics::total_trades(&self.results)
    }
}

//every (short, long) combination with short < long, long windows outermost
pub fn combinations(ma_short: &[usize], ma_long: &[usize]) -> Vec<(usize, usize)> {
    let mut combos = Vec::new();
    for &long in ma_long {
        for &short in ma_short {
            if short >= long {
                continue;
            }
            if !combos.contains(&(short, long)) {
                combos.push((short, long));
            }
        }
    }
    combos
}

//evaluates one (short, long) combination on an annotated series
pub fn evaluate_combination(
    series: &AnnotatedSeries,
    instrument: &Instrument,
    ma_short: usize,
    ma_long: usize,
    gain_unit: GainUnit,
) -> Result<SweepResult> {
    let events = detect_crossovers(series, ma_short, ma_long)?;

    let trades = match gain_unit {
        GainUnit::Price => evaluate(&events),
        GainUnit::Pips => evaluate_scaled(&events, |diff| instrument.price_to_pips(diff)),
    };

    Ok(SweepResult::summarize(
        &trades,
        &instrument.name,
        ma_short,
        ma_long,
    ))
}

//drives the pair x (short, long) grid
pub struct SweepEngine<'a, S: PriceSource> {
    config: SweepConfig,
    catalog: &'a InstrumentCatalog,
    source: &'a S,
}

impl<'a, S: PriceSource> SweepEngine<'a, S> {
    pub fn new(config: SweepConfig, catalog: &'a InstrumentCatalog, source: &'a S) -> Self {
        SweepEngine {
            config,
            catalog,
            source,
        }
    }

    //loads, annotates once, and evaluates every combination for one pair
    pub fn run_pair(&self, pair: &str, windows: &BTreeSet<usize>) -> Result<Vec<SweepResult>> {
        let instrument = self
            .catalog
            .lookup(pair)
            .ok_or_else(|| BacktestError::NotFound(pair.to_string()))?;

        info!("Running {}", pair);

        let points = self.source.load(pair, &self.config.granularity)?;
        let series = annotate(points, windows);
        if series.is_empty() {
            warn!("{}: no price data, every combination has zero trades", pair);
        }

        debug!(
            "{}: {} points annotated with {:?}",
            pair,
            series.len(),
            windows.iter().map(|&w| ma_column(w)).collect::<Vec<_>>()
        );

        combinations(&self.config.ma_short, &self.config.ma_long)
            .into_iter()
            .map(|(short, long)| {
                evaluate_combination(&series, instrument, short, long, self.config.gain_unit)
            })
            .collect()
    }

    //runs the sweep over the given pairs
    pub fn run(&self, pairs: &[String]) -> Result<SweepReport> {
        let windows = sweep_windows(&self.config.ma_short, &self.config.ma_long);

        //per pair outcomes, in input order either way
        let outcomes: Vec<(&String, Result<Vec<SweepResult>>)> = if self.config.parallel {
            pairs
                .par_iter()
                .map(|pair| (pair, self.run_pair(pair, &windows)))
                .collect()
        } else {
            pairs
                .iter()
                .map(|pair| (pair, self.run_pair(pair, &windows)))
                .collect()
        };

        let mut report = SweepReport::default();

        for (pair, outcome) in outcomes {
            match outcome {
                Ok(results) => report.results.extend(results),
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::FailFast => {
                        error!("{} failed, aborting sweep: {}", pair, e);
                        return Err(BacktestError::for_pair(pair, e));
                    }
                    FailurePolicy::Isolate => {
                        warn!("{} failed, skipping: {}", pair, e);
                        report.failures.push(PairFailure {
                            pair: pair.clone(),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        report.results.sort_by(SweepResult::report_order);

        info!(
            "Sweep finished: {} combinations, {} trades, {} failed pairs",
            report.results.len(),
            report.total_trades(),
            report.failures.len()
        );

        Ok(report)
    }
}
