pub mod sweep;

pub use sweep::{
    combinations, evaluate_combination, PairFailure, SweepConfig, SweepEngine, SweepReport,
};
