//! Command-line parsing for the sales dashboard.
//!
//! Parsing and dispatch live apart from the controller so the same
//! `Dashboard` serves every mode.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ReportKind;

/// Environment variable for the web server bind address.
pub const BIND_ENV_VAR: &str = "AUTODASH_BIND";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "autodash", version, about = "Automobile Sales Statistics Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive terminal dashboard (default).
    Tui(TuiArgs),
    /// Serve the dashboard over HTTP.
    Serve(ServeArgs),
    /// Print one report as plain-text tables and optionally export it.
    Report(ReportArgs),
}

/// Options shared by every mode.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Dataset location: `http(s)://` URL or local CSV path.
    /// Falls back to `AUTODASH_DATA`, then the published dataset.
    #[arg(long, value_name = "URL|PATH")]
    pub data: Option<String>,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory for the rolling log file.
    #[arg(long, value_name = "DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Address to listen on.
    #[arg(long, env = BIND_ENV_VAR, default_value = "127.0.0.1:8050")]
    pub bind: SocketAddr,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Which statistics to compute.
    #[arg(long, value_enum)]
    pub report: ReportKind,

    /// Year for yearly statistics (1980..=2023).
    #[arg(long)]
    pub year: Option<String>,

    /// Write the chart set as pretty JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Write the chart set as flat CSV rows.
    #[arg(long = "export-csv", value_name = "PATH")]
    pub export_csv: Option<PathBuf>,
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Tui(args) => &args.common,
            Command::Serve(args) => &args.common,
            Command::Report(args) => &args.common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_parses_kind_and_exports() {
        let cli = Cli::parse_from([
            "autodash",
            "report",
            "--report",
            "yearly",
            "--year",
            "2005",
            "--export-csv",
            "out.csv",
        ]);
        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.report, ReportKind::Yearly);
        assert_eq!(args.year.as_deref(), Some("2005"));
        assert_eq!(args.export_csv, Some(PathBuf::from("out.csv")));
        assert!(args.export_json.is_none());
    }

    #[test]
    fn tui_defaults() {
        let cli = Cli::parse_from(["autodash", "tui", "--data", "sales.csv"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui command");
        };
        assert_eq!(args.common.data.as_deref(), Some("sales.csv"));
        assert_eq!(args.log_dir, PathBuf::from("logs"));
        assert!(!args.common.debug);
    }

    #[test]
    fn serve_accepts_bind_flag() {
        let cli = Cli::parse_from(["autodash", "serve", "--bind", "0.0.0.0:9000", "--debug"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.bind, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert!(args.common.debug);
    }

    #[test]
    fn unknown_report_kind_is_rejected() {
        assert!(Cli::try_parse_from(["autodash", "report", "--report", "monthly"]).is_err());
    }
}
