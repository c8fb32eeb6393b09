use crate::strategy::TradeResult;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::cmp::Ordering;

//summary of one (pair, ma_short, ma_long) combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub pair: String,
    pub ma_short: usize,
    pub ma_long: usize,

    //every detected crossover, including the last unrealized one
    pub num_trades: usize,

    //aggregates over realized gains only
    pub total_gain: f64,
    pub mean_gain: Option<f64>,
    pub min_gain: Option<f64>,
    pub max_gain: Option<f64>,
}

impl SweepResult {
    //aggregates trade results for a combination
    pub fn summarize(results: &[TradeResult], pair: &str, ma_short: usize, ma_long: usize) -> Self {
        let gains: Vec<f64> = results.iter().filter_map(|r| r.gain).collect();

        let (total_gain, mean_gain, min_gain, max_gain) = if gains.is_empty() {
            (0.0, None, None, None)
        } else {
            let realized: &[f64] = &gains;
            (
                realized.iter().sum::<f64>(),
                Some(realized.mean()),
                Some(Statistics::min(realized)),
                Some(Statistics::max(realized)),
            )
        };

        SweepResult {
            pair: pair.to_string(),
            ma_short,
            ma_long,
            num_trades: results.len(),
            total_gain,
            mean_gain,
            min_gain,
            max_gain,
        }
    }

    //ordering used for the final report
    pub fn report_order(a: &SweepResult, b: &SweepResult) -> Ordering {
        a.pair
            .cmp(&b.pair)
            .then(a.ma_short.cmp(&b.ma_short))
            .then(a.ma_long.cmp(&b.ma_long))
    }
}

//sorts results by total gain, best first
pub fn rank_by_total_gain(results: &[SweepResult]) -> Vec<&SweepResult> {
    let mut ranked: Vec<&SweepResult> = results.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_gain
            .partial_cmp(&a.total_gain)
            .unwrap_or(Ordering::Equal)
            .then(SweepResult::report_order(a, b))
    });
    ranked
}

//best combination per pair, in pair order
pub fn best_by_pair(results: &[SweepResult]) -> Vec<&SweepResult> {
    let mut best: Vec<&SweepResult> = Vec::new();

    for result in rank_by_total_gain(results) {
        if !best.iter().any(|b| b.pair == result.pair) {
            best.push(result);
        }
    }

    best.sort_by(|a, b| a.pair.cmp(&b.pair));
    best
}

//total trades across all combinations
pub fn total_trades(results: &[SweepResult]) -> usize {
    results.iter().map(|r| r.num_trades).sum()
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| format!("{:.5}", v)).unwrap_or_else(|| "-".to_string())
}

//prints results in a formatted table
pub fn pretty_print_table(results: &[&SweepResult]) {
    let mut table = Table::new();

    table.add_row(Row::new(vec![
        Cell::new("Pair"),
        Cell::new("MA Short"),
        Cell::new("MA Long"),
        Cell::new("Trades"),
        Cell::new("Total Gain"),
        Cell::new("Mean Gain"),
        Cell::new("Min Gain"),
        Cell::new("Max Gain"),
    ]));

    for result in results {
        table.add_row(Row::new(vec![
            Cell::new(&result.pair),
            Cell::new(&result.ma_short.to_string()),
            Cell::new(&result.ma_long.to_string()),
            Cell::new(&result.num_trades.to_string()),
            Cell::new(&format!("{:.5}", result.total_gain)),
            Cell::new(&format_optional(result.mean_gain)),
            Cell::new(&format_optional(result.min_gain)),
            Cell::new(&format_optional(result.max_gain)),
        ]));
    }

    table.printstd();
}
