use crate::error::DatasetError;
use core_types::{RawRecord, RawValue};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One row of a dataset file, exactly as written.
///
/// Cells stay text here; cleaning them is the engine's job. Absent columns
/// and empty cells both come through as `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Total_Customers")]
    total_customers: Option<String>,
    #[serde(rename = "New_Customers")]
    new_customers: Option<String>,
    #[serde(rename = "Churned_Customers")]
    churned_customers: Option<String>,
    #[serde(rename = "Avg_Monthly_Price_USD", alias = "Avg_Monthly_Price")]
    avg_monthly_price: Option<String>,
}

impl From<CsvRow> for RawRecord {
    fn from(row: CsvRow) -> Self {
        RawRecord {
            year: row.year.map(RawValue::Text),
            total_customers: row.total_customers.map(RawValue::Text),
            new_customers: row.new_customers.map(RawValue::Text),
            churned_customers: row.churned_customers.map(RawValue::Text),
            avg_monthly_price: row.avg_monthly_price.map(RawValue::Text),
        }
    }
}

/// Reads a comma-separated dataset with a header row.
///
/// Extra columns are ignored and short rows are tolerated.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, DatasetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        records.push(RawRecord::from(result?));
    }
    Ok(records)
}

/// Reads a dataset file from disk.
pub fn read_csv_path(path: &Path) -> Result<Vec<RawRecord>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = read_csv(file)?;
    tracing::info!(path = %path.display(), rows = records.len(), "Loaded dataset file.");
    Ok(records)
}
