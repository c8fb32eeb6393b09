pub mod loader;
pub mod price;

pub use loader::{load_prices, CsvPriceSource, PriceSource};
pub use price::{parse_timestamp, PricePoint};
