//! `autosales-dash` library crate.
//!
//! An interactive dashboard over the historical automobile sales dataset.
//! The binary (`autodash`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the terminal UI and the web server share one controller
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod controller;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod render;
pub mod report;
pub mod shell;
pub mod stats;
pub mod tui;
pub mod web;

#[cfg(test)]
mod testutil;
