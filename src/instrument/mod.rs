pub mod catalog;
#[allow(clippy::module_inception)]
pub mod instrument;

pub use catalog::{index_by_name, load_all, InstrumentCatalog};
pub use instrument::Instrument;
