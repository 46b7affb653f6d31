//! CSV ingest for the sales dataset.
//!
//! The source table is trusted to be clean, so ingest is all-or-nothing:
//! - the header must carry every schema column (extra columns are ignored)
//! - the first malformed row aborts the load with its line number
//! - a file with no data rows is rejected
//!
//! Every failure here is `DataUnavailable`; there is no partial dataset.

use std::io::Read;

use csv::StringRecord;

use crate::domain::{SalesRecord, SalesTable};
use crate::error::AppError;

/// Columns the dashboard reads. Names match the published CSV exactly.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Year",
    "Month",
    "Vehicle_Type",
    "Automobile_Sales",
    "Advertising_Expenditure",
    "unemployment_rate",
    "Recession",
];

/// Parse a sales CSV into an immutable table.
pub fn parse_sales_csv<R: Read>(input: R) -> Result<SalesTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let raw_headers = reader
        .headers()
        .map_err(|e| AppError::data_unavailable(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let headers = normalize_headers(&raw_headers);
    ensure_required_columns_exist(&headers)?;
    reader.set_headers(headers);

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<SalesRecord>().enumerate() {
        // +2: records start on the line after the header, lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::data_unavailable(format!("Malformed sales row at line {line}: {e}"))
        })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(AppError::data_unavailable("Sales dataset contains no rows."));
    }

    Ok(SalesTable::new(records))
}

fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers.iter().map(normalize_header_name).collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM;
    // left in place it makes `Date`/`Year` look missing.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_required_columns_exist(headers: &StringRecord) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(AppError::data_unavailable(format!(
        "Sales dataset is missing required column(s): {}",
        missing.join(", ")
    )))
}
