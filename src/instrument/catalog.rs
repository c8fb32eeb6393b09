use crate::error::{BacktestError, Result};
use crate::instrument::Instrument;
use csv::ReaderBuilder;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 5] = ["name", "type", "displayName", "pipLocation", "marginRate"];

#[derive(Debug, Deserialize)]
struct CsvRecord {
    name: String,
    #[serde(rename = "type")]
    ins_type: String,
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(rename = "pipLocation")]
    pip_location: i32,
    #[serde(rename = "marginRate")]
    margin_rate: f64,
}

//loads every instrument from the metadata csv
pub fn load_all<P: AsRef<Path>>(path: P) -> Result<Vec<Instrument>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(BacktestError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| BacktestError::DataFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let headers = reader
        .headers()
        .map_err(|e| BacktestError::DataFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(BacktestError::DataFormat {
                path: path.to_path_buf(),
                reason: format!("missing required column '{}'", column),
            });
        }
    }

    let mut instruments = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord = result.map_err(|e| BacktestError::DataFormat {
            path: path.to_path_buf(),
            reason: format!("record at line {}: {}", index + 2, e),
        })?;

        if record.name.is_empty() {
            return Err(BacktestError::DataFormat {
                path: path.to_path_buf(),
                reason: format!("record at line {} has an empty name", index + 2),
            });
        }

        instruments.push(Instrument::new(
            record.name,
            record.ins_type,
            record.display_name,
            record.pip_location,
            record.margin_rate,
        ));
    }

    debug!("Loaded {} instruments from {:?}", instruments.len(), path);

    Ok(instruments)
}

//builds the name index, rejecting duplicate names
pub fn index_by_name(instruments: Vec<Instrument>) -> Result<IndexMap<String, Instrument>> {
    let mut index = IndexMap::with_capacity(instruments.len());

    for instrument in instruments {
        if index.contains_key(&instrument.name) {
            return Err(BacktestError::DuplicateKey(instrument.name));
        }
        index.insert(instrument.name.clone(), instrument);
    }

    Ok(index)
}

//instrument metadata indexed by pair name, in file order
#[derive(Debug, Clone, Default)]
pub struct InstrumentCatalog {
    instruments: IndexMap<String, Instrument>,
}

impl InstrumentCatalog {
    pub fn new(instruments: Vec<Instrument>) -> Result<Self> {
        Ok(InstrumentCatalog {
            instruments: index_by_name(instruments)?,
        })
    }

    //loads and indexes the metadata csv
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(load_all(path)?)
    }

    pub fn lookup(&self, name: &str) -> Option<&Instrument> {
        self.instruments.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instruments.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    //builds every A_B pair from the currencies that exists in the catalog
    //self pairs (A_A) are only considered when include_self_pairs is set
    pub fn test_pairs(&self, currencies: &[String], include_self_pairs: bool) -> Vec<String> {
        let mut pairs = Vec::new();

        for base in currencies {
            for quote in currencies {
                if base == quote && !include_self_pairs {
                    continue;
                }
                let pair = format!("{}_{}", base, quote);
                if self.contains(&pair) && !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
        }

        debug!("Test pairs: {:?}", pairs);

        pairs
    }
}
