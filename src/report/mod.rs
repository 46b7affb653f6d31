//! Plain-text rendering of computed chart sets for the `report` command.

pub mod format;

pub use format::{format_chart, format_chart_set, format_summary};
