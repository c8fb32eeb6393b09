use crate::error::{BacktestError, Result};
use crate::strategy::annotator::AnnotatedSeries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//trade direction (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    //converts to sign (Buy = +1, Sell = -1)
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Buy => 1,
            Direction::Sell => -1,
        }
    }
}

//where the short average sits relative to the long one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffState {
    //one of the averages has no value yet
    Undefined,
    Below,
    AboveOrEqual,
}

impl DiffState {
    pub fn from_diff(diff: Option<f64>) -> Self {
        match diff {
            Some(d) if d.is_nan() => DiffState::Undefined,
            Some(d) if d >= 0.0 => DiffState::AboveOrEqual,
            Some(_) => DiffState::Below,
            None => DiffState::Undefined,
        }
    }
}

//state machine over short - long differences
//signals only on a flip between two defined states, an undefined point resets it
#[derive(Debug, Clone)]
pub struct CrossoverDetector {
    state: DiffState,
}

impl CrossoverDetector {
    pub fn new() -> Self {
        CrossoverDetector {
            state: DiffState::Undefined,
        }
    }

    pub fn state(&self) -> DiffState {
        self.state
    }

    //feeds the next difference and returns a signal if the sign flipped
    pub fn step(&mut self, diff: Option<f64>) -> Option<Direction> {
        let next = DiffState::from_diff(diff);

        let signal = match (self.state, next) {
            (DiffState::Below, DiffState::AboveOrEqual) => Some(Direction::Buy),
            (DiffState::AboveOrEqual, DiffState::Below) => Some(Direction::Sell),
            _ => None,
        };

        self.state = next;
        signal
    }
}

impl Default for CrossoverDetector {
    fn default() -> Self {
        Self::new()
    }
}

//a detected crossover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    //position in the price series
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub direction: Direction,
}

//runs the detector over an annotated series for one (short, long) combination
pub fn detect_crossovers(
    series: &AnnotatedSeries,
    ma_short: usize,
    ma_long: usize,
) -> Result<Vec<TradeEvent>> {
    let short = series
        .ma(ma_short)
        .ok_or(BacktestError::MissingWindow(ma_short))?;
    let long = series
        .ma(ma_long)
        .ok_or(BacktestError::MissingWindow(ma_long))?;

    let mut detector = CrossoverDetector::new();
    let mut events = Vec::new();

    for (index, point) in series.points().iter().enumerate() {
        let diff = match (short[index], long[index]) {
            (Some(s), Some(l)) => Some(s - l),
            _ => None,
        };

        if let Some(direction) = detector.step(diff) {
            events.push(TradeEvent {
                index,
                timestamp: point.timestamp,
                close: point.close,
                direction,
            });
        }
    }

    Ok(events)
}
