//! Terminal tables for chart sets.
//!
//! Formatting lives here so the controller stays free of presentation code
//! and output changes stay localized.

use crate::domain::{ChartDescriptor, ChartSet, ReportKind, SalesTable};
use crate::shell::TITLE;

const SERIES_WIDTH: usize = 20;
const CATEGORY_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 16;

/// Dataset and selection header printed above the tables.
pub fn format_summary(table: &SalesTable, report: ReportKind, year: Option<i32>) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {TITLE} ===\n"));
    let span = table
        .year_span()
        .map(|(first, last)| format!("{first}-{last}"))
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!(
        "Dataset: {} rows | years {span} | {} recession rows\n",
        table.len(),
        table.recession_rows().count(),
    ));

    let year = year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
    out.push_str(&format!("Report: {} | Year: {year}\n", report.label()));

    out
}

/// All charts in order, or a single notice when there are none.
pub fn format_chart_set(set: &ChartSet) -> String {
    if set.is_empty() {
        return "no charts for this selection\n".to_string();
    }

    let mut out = String::new();
    for (idx, chart) in set.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("[{}] ", idx + 1));
        out.push_str(&format_chart(chart));
    }
    out
}

/// One chart as a titled table of (series, category, value) rows.
pub fn format_chart(chart: &ChartDescriptor) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}, {}, n={})\n",
        chart.title,
        chart.kind.display_name(),
        chart.scope,
        chart.source_rows,
    ));

    if chart.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let named = chart.series.iter().any(|s| s.name.is_some());
    push_row(&mut out, named, "series", &chart.x_label, &chart.y_label);
    push_row(
        &mut out,
        named,
        &"-".repeat(SERIES_WIDTH),
        &"-".repeat(CATEGORY_WIDTH),
        &"-".repeat(VALUE_WIDTH),
    );

    for series in &chart.series {
        let name = series.name.as_deref().unwrap_or("");
        for point in &series.points {
            push_row(
                &mut out,
                named,
                name,
                &point.category.to_string(),
                &format!("{:.2}", point.value),
            );
        }
    }

    out
}

fn push_row(out: &mut String, named: bool, series: &str, category: &str, value: &str) {
    let line = if named {
        format!(
            "{:<sw$} {:<cw$} {:>vw$}",
            truncate(series, SERIES_WIDTH),
            truncate(category, CATEGORY_WIDTH),
            truncate(value, VALUE_WIDTH),
            sw = SERIES_WIDTH,
            cw = CATEGORY_WIDTH,
            vw = VALUE_WIDTH,
        )
    } else {
        format!(
            "{:<cw$} {:>vw$}",
            truncate(category, CATEGORY_WIDTH),
            truncate(value, VALUE_WIDTH),
            cw = CATEGORY_WIDTH,
            vw = VALUE_WIDTH,
        )
    };
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::compute_chart_set;
    use crate::testutil::sample_table;

    #[test]
    fn empty_set_prints_notice() {
        assert_eq!(format_chart_set(&ChartSet::empty()), "no charts for this selection\n");
    }

    #[test]
    fn recession_report_lists_every_chart() {
        let table = sample_table();
        let set = compute_chart_set(&table, Some(ReportKind::Recession.label()), None);
        let text = format_chart_set(&set);

        assert!(text.contains("[1] Average Automobile Sales Over Recession Years (line, recession rows, n=4)"));
        assert!(text.contains("[4] Unemployment Rate vs Sales by Vehicle Type"));
        assert!(text.contains("Unemployment Rate"));
        assert!(text.contains("200.00"));
        assert!(text.lines().any(|l| l.starts_with("Mediumfamilycar")));
    }

    #[test]
    fn year_scoped_chart_without_rows_says_so() {
        let table = sample_table();
        let set = compute_chart_set(&table, Some(ReportKind::Yearly.label()), Some("1999"));
        let text = format_chart(&set.charts[2]);
        assert!(text.starts_with("Avg Vehicles Sold by Type in 1999 (bar, year 1999, n=0)"));
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn summary_names_selection() {
        let table = sample_table();
        let text = format_summary(&table, ReportKind::Yearly, Some(2005));
        assert!(text.contains("8 rows"));
        assert!(text.contains("years 1980-2006"));
        assert!(text.contains("4 recession rows"));
        assert!(text.contains("Report: Yearly Statistics | Year: 2005"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd.");
    }
}
