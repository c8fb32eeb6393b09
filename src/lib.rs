//a Rust-based moving-average crossover sweep backtester for currency pairs

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod instrument;
pub mod metrics;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{parse_currencies, FailurePolicy, GainUnit, SweepConfiguration};
    pub use crate::data::{load_prices, CsvPriceSource, PricePoint, PriceSource};
    pub use crate::engine::{PairFailure, SweepConfig, SweepEngine, SweepReport};
    pub use crate::error::BacktestError;
    pub use crate::instrument::{Instrument, InstrumentCatalog};
    pub use crate::metrics::{
        best_by_pair, pretty_print_table, rank_by_total_gain, write_report, SweepResult,
    };
    pub use crate::strategy::{
        annotate, detect_crossovers, evaluate, sweep_windows, AnnotatedSeries, Direction,
        TradeEvent, TradeResult,
    };
}
