use crate::strategy::crossover::{Direction, TradeEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a trade event with its realized outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub direction: Direction,

    //close change to the next trade, None for the last trade
    pub delta: Option<f64>,

    //delta * direction, None when delta is None
    pub gain: Option<f64>,
}

//evaluates trades in raw price units
pub fn evaluate(events: &[TradeEvent]) -> Vec<TradeResult> {
    evaluate_scaled(events, |diff| diff)
}

//evaluates trades with each price delta passed through `to_unit` (eg price to pips)
//each delta only looks at the next detected trade, never at the full series
pub fn evaluate_scaled<F>(events: &[TradeEvent], to_unit: F) -> Vec<TradeResult>
where
    F: Fn(f64) -> f64,
{
    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let delta = events
                .get(i + 1)
                .map(|next| to_unit(next.close - event.close));
            let gain = delta.map(|d| d * event.direction.sign() as f64);

            TradeResult {
                index: event.index,
                timestamp: event.timestamp,
                close: event.close,
                direction: event.direction,
                delta,
                gain,
            }
        })
        .collect()
}
