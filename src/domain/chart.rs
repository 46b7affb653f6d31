//! Chart descriptors: aggregated rows plus the metadata needed to draw them.
//!
//! Descriptors are produced per selector change and handed straight to a
//! renderer (SVG for the web page, Ratatui buffer for the terminal). They are
//! `Serialize` so the web runtime and the JSON export can ship them as-is.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    /// Bars grouped per category, one series per group (e.g. vehicle type).
    GroupedBar,
}

impl ChartKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::GroupedBar => "grouped bar",
        }
    }
}

/// Which slice of the table a chart was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "year", rename_all = "snake_case")]
pub enum DataScope {
    /// Every row of the table.
    Full,
    /// Rows with `Recession == 1`.
    Recession,
    /// Rows of a single year.
    Year(i32),
}

impl fmt::Display for DataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataScope::Full => write!(f, "all rows"),
            DataScope::Recession => write!(f, "recession rows"),
            DataScope::Year(year) => write!(f, "year {year}"),
        }
    }
}

/// A group key as shown on a chart axis or pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Category {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Int(v) => write!(f, "{v}"),
            Category::Float(v) => write!(f, "{v}"),
            Category::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub category: Category,
    pub value: f64,
}

/// One named run of points. Single-series charts leave `name` empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: Option<String>,
    pub points: Vec<DataPoint>,
}

impl Series {
    pub fn unnamed(points: Vec<DataPoint>) -> Self {
        Self { name: None, points }
    }

    pub fn named(name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self {
            name: Some(name.into()),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub title: String,
    /// Dataset column used for categories (x axis, pie names).
    pub x_field: String,
    /// Dataset column that was aggregated (y axis, pie values).
    pub y_field: String,
    pub x_label: String,
    pub y_label: String,
    pub scope: DataScope,
    /// Number of table rows that fed the aggregation.
    pub source_rows: usize,
    pub series: Vec<Series>,
}

impl ChartDescriptor {
    /// True when no series carries any point.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Sum of every value across all series.
    pub fn total(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.value)
            .sum()
    }

    /// Distinct categories across all series, in first-seen order.
    pub fn categories(&self) -> Vec<&Category> {
        let mut out: Vec<&Category> = Vec::new();
        for point in self.series.iter().flat_map(|s| s.points.iter()) {
            if !out.contains(&&point.category) {
                out.push(&point.category);
            }
        }
        out
    }

    /// Largest value across all series (0 when empty).
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.value)
            .fold(0.0, f64::max)
    }
}

/// The content of the output container: charts laid out two per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSet {
    pub charts: Vec<ChartDescriptor>,
}

impl ChartSet {
    pub const PER_ROW: usize = 2;

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn get(&self, idx: usize) -> Option<&ChartDescriptor> {
        self.charts.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChartDescriptor> {
        self.charts.iter()
    }

    /// Grid rows for display.
    pub fn rows(&self) -> std::slice::Chunks<'_, ChartDescriptor> {
        self.charts.chunks(Self::PER_ROW)
    }
}
