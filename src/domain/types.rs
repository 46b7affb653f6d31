//! Dataset and selection types.
//!
//! The sales table is loaded once and never mutated; everything downstream
//! borrows records from it.

use std::collections::BTreeSet;

use chrono::Month;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// First year offered by the year selector.
pub const YEAR_MIN: i32 = 1980;
/// Last year offered by the year selector (inclusive).
pub const YEAR_MAX: i32 = 2023;

/// Short month labels in calendar order, as they appear in the source data.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One row of the historical automobile sales dataset.
///
/// Column names follow the published CSV. Any additional columns in the
/// source (GDP, price, city, ...) are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month", deserialize_with = "deserialize_month")]
    pub month: Month,
    #[serde(rename = "Vehicle_Type")]
    pub vehicle_type: String,
    #[serde(rename = "Automobile_Sales")]
    pub automobile_sales: f64,
    #[serde(rename = "Advertising_Expenditure")]
    pub advertising_expenditure: f64,
    #[serde(rename = "unemployment_rate")]
    pub unemployment_rate: f64,
    #[serde(rename = "Recession", deserialize_with = "deserialize_flag")]
    pub recession: bool,
}

impl SalesRecord {
    /// Calendar month number (1..=12).
    pub fn month_number(&self) -> u32 {
        self.month.number_from_month()
    }

    pub fn month_label(&self) -> &'static str {
        month_label(self.month_number())
    }
}

/// Label for a 1-based month number.
pub fn month_label(number: u32) -> &'static str {
    let idx = (number.clamp(1, 12) - 1) as usize;
    MONTH_LABELS[idx]
}

fn deserialize_month<'de, D>(deserializer: D) -> Result<Month, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse::<Month>()
        .map_err(|_| serde::de::Error::custom(format!("invalid month '{raw}'")))
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| serde::de::Error::custom(format!("invalid recession flag '{raw}'")))?;
    if value == 1.0 {
        Ok(true)
    } else if value == 0.0 {
        Ok(false)
    } else {
        Err(serde::de::Error::custom(format!(
            "recession flag must be 0 or 1 (got '{raw}')"
        )))
    }
}

/// The in-memory sales dataset.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows flagged as recession periods.
    pub fn recession_rows(&self) -> impl Iterator<Item = &SalesRecord> + '_ {
        self.records.iter().filter(|r| r.recession)
    }

    /// Rows for a single calendar year.
    pub fn rows_for_year(&self, year: i32) -> impl Iterator<Item = &SalesRecord> + '_ {
        self.records.iter().filter(move |r| r.year == year)
    }

    /// Smallest and largest year present, if any.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Distinct vehicle types, sorted.
    pub fn vehicle_types(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.vehicle_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// The two report modes offered by the statistics selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Yearly,
    Recession,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [ReportKind::Yearly, ReportKind::Recession];

    /// Selector label, also the value the UI sends back.
    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Yearly => "Yearly Statistics",
            ReportKind::Recession => "Recession Period Statistics",
        }
    }

    /// Exact match against the selector labels; anything else is "no report".
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == raw)
    }
}

/// Current selector values as handed over by a runtime.
///
/// Values stay raw: the runtime may deliver any text, and interpreting it is
/// the controller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub report: Option<String>,
    pub year: Option<String>,
}

impl SelectionState {
    pub fn yearly(year: i32) -> Self {
        Self {
            report: Some(ReportKind::Yearly.label().to_string()),
            year: Some(year.to_string()),
        }
    }

    pub fn recession() -> Self {
        Self {
            report: Some(ReportKind::Recession.label().to_string()),
            year: None,
        }
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_kind_matches_labels_exactly() {
        assert_eq!(ReportKind::parse("Yearly Statistics"), Some(ReportKind::Yearly));
        assert_eq!(
            ReportKind::parse("Recession Period Statistics"),
            Some(ReportKind::Recession)
        );
        assert_eq!(ReportKind::parse("yearly statistics"), None);
        assert_eq!(ReportKind::parse("Select Statistics"), None);
    }

    #[test]
    fn month_labels_follow_calendar() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(MONTH_LABELS.len(), 12);
    }

    #[test]
    fn table_views_filter_rows() {
        let table = crate::testutil::sample_table();
        assert!(table.recession_rows().all(|r| r.recession));
        assert!(table.rows_for_year(2005).all(|r| r.year == 2005));
        assert_eq!(table.year_span(), Some((1980, 2006)));
        assert_eq!(table.vehicle_types(), vec!["Mediumfamilycar", "Smallfamiliycar", "Sports"]);
    }
}
