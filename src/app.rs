//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging for the chosen mode
//! - loads the sales dataset once
//! - hands a `Dashboard` to the terminal UI, the web server or the report printer

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, CommonArgs, ReportArgs};
use crate::controller::{compute_chart_set, parse_year};
use crate::data::{self, DataSource};
use crate::error::AppError;
use crate::shell::Dashboard;

/// Entry point for the `autodash` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` must be loaded before clap reads env fallbacks.
    dotenvy::dotenv().ok();

    // `autodash` and `autodash --data x.csv` behave like `autodash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    // Held until exit so the file writer flushes.
    let _log_guard = match &cli.command {
        Command::Tui(args) => Some(crate::logging::init_file(&args.log_dir, args.common.debug)?),
        Command::Serve(args) => {
            crate::logging::init_stderr(args.common.debug)?;
            None
        }
        Command::Report(args) => {
            crate::logging::init_stderr(args.common.debug)?;
            None
        }
    };

    let dashboard = load_dashboard(cli.command.common())?;

    match cli.command {
        Command::Tui(_) => crate::tui::run(dashboard),
        Command::Serve(args) => crate::web::serve(dashboard, args.bind),
        Command::Report(args) => handle_report(&dashboard, &args),
    }
}

/// Fetch and parse the dataset. Any failure here aborts startup.
fn load_dashboard(common: &CommonArgs) -> Result<Dashboard, AppError> {
    let source = DataSource::resolve(common.data.as_deref());
    let table = data::load(&source)?;
    Ok(Dashboard::new(Arc::new(table)))
}

fn handle_report(dashboard: &Dashboard, args: &ReportArgs) -> Result<(), AppError> {
    // Validate up front: the controller would silently treat a bad year as unset.
    let year = args
        .year
        .as_deref()
        .map(parse_year)
        .transpose()
        .map_err(|e| AppError::usage(format!("Invalid --year: {e}")))?;

    let set = compute_chart_set(
        dashboard.table(),
        Some(args.report.label()),
        args.year.as_deref(),
    );

    println!("{}", crate::report::format_summary(dashboard.table(), args.report, year));
    print!("{}", crate::report::format_chart_set(&set));

    if let Some(path) = &args.export_json {
        crate::io::write_chart_set_json(path, &set)?;
        info!(path = %path.display(), charts = set.len(), "wrote JSON export");
    }
    if let Some(path) = &args.export_csv {
        crate::io::write_chart_set_csv(path, &set)?;
        info!(path = %path.display(), charts = set.len(), "wrote CSV export");
    }

    Ok(())
}

/// Rewrite argv so `autodash` defaults to `autodash tui`.
///
/// Rules:
/// - `autodash`                      -> `autodash tui`
/// - `autodash --data x.csv ...`     -> `autodash tui --data x.csv ...`
/// - `autodash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "serve" | "report");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["autodash"])), args(&["autodash", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["autodash", "--data", "x.csv"])),
            args(&["autodash", "tui", "--data", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for argv in [
            args(&["autodash", "serve", "--bind", "0.0.0.0:8050"]),
            args(&["autodash", "report", "--report", "recession"]),
            args(&["autodash", "--help"]),
            args(&["autodash", "-V"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn dashboard_loads_from_data_flag() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(crate::testutil::SAMPLE_CSV.as_bytes()).unwrap();
        let common = CommonArgs {
            data: Some(file.path().display().to_string()),
            debug: false,
        };
        let dashboard = load_dashboard(&common).unwrap();
        assert_eq!(dashboard.table().len(), 8);
    }

    #[test]
    fn report_rejects_bad_year() {
        let dashboard = Dashboard::new(Arc::new(crate::testutil::sample_table()));
        let report = ReportArgs {
            common: CommonArgs {
                data: None,
                debug: false,
            },
            report: crate::domain::ReportKind::Yearly,
            year: Some("1850".to_string()),
            export_json: None,
            export_csv: None,
        };
        let err = handle_report(&dashboard, &report).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit::USAGE);
    }
}
