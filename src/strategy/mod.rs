pub mod annotator;
pub mod crossover;
pub mod evaluator;

pub use annotator::{annotate, ma_column, rolling_mean, sweep_windows, AnnotatedSeries};
pub use crossover::{detect_crossovers, CrossoverDetector, DiffState, Direction, TradeEvent};
pub use evaluator::{evaluate, evaluate_scaled, TradeResult};
