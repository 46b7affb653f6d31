//! View model: the two reactive handlers behind the dashboard.
//!
//! Both functions are pure over their inputs and the immutable table. Runtimes
//! call them through the bindings declared in `shell`; nothing here keeps
//! state between invocations.

use thiserror::Error;
use tracing::debug;

use crate::domain::{ChartSet, ReportKind, SalesTable, YEAR_MAX, YEAR_MIN};

pub mod charts;

pub use charts::{recession_charts, yearly_charts};

/// A year selector value that cannot be used.
///
/// Never surfaced to the user: the controller treats it as "no year".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelection {
    #[error("year value {0:?} is not an integer")]
    NotAnInteger(String),
    #[error("year {0} is outside the selectable range")]
    OutOfRange(i64),
}

/// Interpret a raw year selector value.
pub fn parse_year(raw: &str) -> Result<i32, InvalidSelection> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| InvalidSelection::NotAnInteger(trimmed.to_string()))?;

    if !(i64::from(YEAR_MIN)..=i64::from(YEAR_MAX)).contains(&value) {
        return Err(InvalidSelection::OutOfRange(value));
    }

    // In range, so it fits.
    Ok(value as i32)
}

/// The year selector is enabled only in yearly mode.
pub fn year_selector_disabled(selected_report: Option<&str>) -> bool {
    selected_report.and_then(ReportKind::parse) != Some(ReportKind::Yearly)
}

/// Charts for the current selection; empty when the selection is incomplete.
pub fn compute_chart_set(
    table: &SalesTable,
    selected_report: Option<&str>,
    selected_year: Option<&str>,
) -> ChartSet {
    match selected_report.and_then(ReportKind::parse) {
        Some(ReportKind::Recession) => recession_charts(table),
        Some(ReportKind::Yearly) => match resolve_year(selected_year) {
            Some(year) => yearly_charts(table, year),
            None => ChartSet::empty(),
        },
        None => ChartSet::empty(),
    }
}

/// Unset, blank or invalid years all collapse to `None`.
fn resolve_year(selected_year: Option<&str>) -> Option<i32> {
    let raw = selected_year.filter(|s| !s.trim().is_empty())?;
    match parse_year(raw) {
        Ok(year) => Some(year),
        Err(err) => {
            debug!(error = %err, "ignoring year selection");
            None
        }
    }
}
