pub mod sweep_config;

pub use sweep_config::{
    parse_currencies, price_data_path, FailurePolicy, GainUnit, SweepConfiguration,
};
