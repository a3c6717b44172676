use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::models::{CategoryColumn, RequestRecord, CRITERIA_COUNT};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read backlog from {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed backlog row")]
    Parse(#[from] csv::Error),
    #[error("row {row}: travel month {month} is outside 1-12")]
    InvalidMonth { row: usize, month: u32 },
    #[error("row {row}: {column} is not a finite number")]
    NonFinite { row: usize, column: &'static str },
}

const CRITERION_COLUMNS: [&str; CRITERIA_COUNT] = [
    "IsSafraAcquirer",
    "NoiseIndex",
    "ExponentialDaysUntilExpiration",
    "TotalExpiredOffers",
    "TotalRefusedOffers",
    "OrderByJR",
    "LogarithmicTimesRouted",
    "OrderPR",
];

pub fn load_backlog(path: &Path) -> Result<Vec<RequestRecord>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|err| DatasetError::Open {
        path: path.to_path_buf(),
        source: csv::Error::from(err),
    })?;
    let records = read_backlog(file)?;
    info!(path = %path.display(), rows = records.len(), "loaded backlog");
    Ok(records)
}

pub fn read_backlog<R: Read>(reader: R) -> Result<Vec<RequestRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, result) in csv_reader.deserialize::<RequestRecord>().enumerate() {
        let record = result?;
        let row = index + 1;
        if !(1..=12).contains(&record.travel_month) {
            return Err(DatasetError::InvalidMonth {
                row,
                month: record.travel_month,
            });
        }
        if let Some(column) = first_non_finite(&record) {
            return Err(DatasetError::NonFinite { row, column });
        }
        records.push(record);
    }

    Ok(records)
}

fn first_non_finite(record: &RequestRecord) -> Option<&'static str> {
    if !record.margin.is_finite() {
        return Some("Margin");
    }

    record
        .criteria()
        .iter()
        .zip(CRITERION_COLUMNS)
        .find(|(value, _)| !value.is_finite())
        .map(|(_, column)| column)
}

/// Sorted distinct values of a categorical column, offered as filter options.
pub fn distinct_values(records: &[RequestRecord], column: CategoryColumn) -> Vec<String> {
    records
        .iter()
        .map(|record| record.category(column))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Holds the most recently loaded backlog, keyed by its source path.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(PathBuf, Vec<RequestRecord>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached records for `path`, reloading when the path changed.
    pub fn get(&mut self, path: &Path) -> Result<&[RequestRecord], DatasetError> {
        if self.cached_path() == Some(path) {
            debug!(path = %path.display(), "backlog cache hit");
        } else {
            self.invalidate();
            let records = load_backlog(path)?;
            self.entry = Some((path.to_path_buf(), records));
        }

        Ok(self
            .entry
            .as_ref()
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[]))
    }

    pub fn cached_path(&self) -> Option<&Path> {
        self.entry.as_ref().map(|(path, _)| path.as_path())
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
