//! Export computed chart sets.
//!
//! JSON keeps the full descriptor structure; CSV flattens every point into a
//! row that is easy to open in a spreadsheet.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::domain::ChartSet;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct FlatRow<'a> {
    chart: usize,
    title: &'a str,
    kind: &'a str,
    series: &'a str,
    category: String,
    value: f64,
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export file '{}': {e}", path.display())))
}

/// Pretty-printed JSON of the whole chart set.
pub fn write_chart_set_json(path: &Path, set: &ChartSet) -> Result<(), AppError> {
    let mut writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut writer, set)
        .map_err(|e| AppError::usage(format!("Failed to write export JSON: {e}")))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| AppError::usage(format!("Failed to write export JSON: {e}")))
}

/// One `chart,title,kind,series,category,value` row per data point.
pub fn write_chart_set_csv(path: &Path, set: &ChartSet) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(create(path)?);

    for (idx, chart) in set.iter().enumerate() {
        for series in &chart.series {
            for point in &series.points {
                writer
                    .serialize(FlatRow {
                        chart: idx + 1,
                        title: &chart.title,
                        kind: chart.kind.display_name(),
                        series: series.name.as_deref().unwrap_or(""),
                        category: point.category.to_string(),
                        value: point.value,
                    })
                    .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
            }
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to write export CSV: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::compute_chart_set;
    use crate::testutil::sample_table;

    #[test]
    fn json_export_keeps_descriptor_fields() {
        let table = sample_table();
        let set = compute_chart_set(&table, Some("Yearly Statistics"), Some("2005"));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.json");

        write_chart_set_json(&path, &set).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let charts = value["charts"].as_array().unwrap();
        assert_eq!(charts.len(), 4);
        assert_eq!(charts[0]["kind"], "line");
        assert_eq!(charts[2]["title"], "Avg Vehicles Sold by Type in 2005");
        assert_eq!(charts[2]["scope"]["scope"], "year");
        assert_eq!(charts[2]["scope"]["year"], 2005);
    }

    #[test]
    fn csv_export_flattens_points() {
        let table = sample_table();
        let set = compute_chart_set(&table, Some("Recession Period Statistics"), None);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.csv");

        write_chart_set_csv(&path, &set).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();
        assert_eq!(lines.next(), Some("chart,title,kind,series,category,value"));

        let expected_rows: usize = set
            .iter()
            .flat_map(|c| c.series.iter())
            .map(|s| s.points.len())
            .sum();
        assert_eq!(lines.clone().count(), expected_rows);
        assert!(lines.any(|l| l.starts_with("4,Unemployment Rate vs Sales by Vehicle Type,grouped bar,Sports,")));
    }

    #[test]
    fn empty_set_exports_no_charts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        write_chart_set_json(&path, &ChartSet::empty()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["charts"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn unwritable_path_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("charts.csv");
        let err = write_chart_set_csv(&path, &ChartSet::empty()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit::USAGE);
    }
}
