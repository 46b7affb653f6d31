//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the loaded dataset (`SalesRecord`, `SalesTable`)
//! - selector state (`ReportKind`, `SelectionState`)
//! - chart outputs (`ChartDescriptor`, `ChartSet`, etc.)

pub mod chart;
pub mod types;

pub use chart::*;
pub use types::*;
