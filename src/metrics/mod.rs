pub mod report;
pub mod summary;

pub use report::{write_report, ReportRow};
pub use summary::{
    best_by_pair, pretty_print_table, rank_by_total_gain, total_trades, SweepResult,
};
