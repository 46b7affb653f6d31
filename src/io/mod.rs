//! File formats: the sales CSV on the way in, chart exports on the way out.

pub mod export;
pub mod ingest;

pub use export::{write_chart_set_csv, write_chart_set_json};
pub use ingest::parse_sales_csv;
