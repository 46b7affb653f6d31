//! Dataset source resolution and fetch.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::domain::SalesTable;
use crate::error::AppError;
use crate::io::ingest::parse_sales_csv;

/// Published historical automobile sales CSV.
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/\
IBMDeveloperSkillsNetwork-DV0101EN-SkillsNetwork/Data%20Files/historical_automobile_sales.csv";

/// Environment variable overriding the dataset location.
pub const DATA_ENV_VAR: &str = "AUTODASH_DATA";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the sales CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    Local(PathBuf),
}

impl DataSource {
    /// `http(s)://` locations are fetched, anything else is a filesystem path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Remote(trimmed.to_string())
        } else {
            DataSource::Local(PathBuf::from(trimmed))
        }
    }

    /// CLI override, then `AUTODASH_DATA`, then the default URL. `app::run`
    /// loads `.env` before this is called.
    pub fn resolve(cli_override: Option<&str>) -> Self {
        let env_value = std::env::var(DATA_ENV_VAR).ok();
        Self::resolve_with(cli_override, env_value.as_deref())
    }

    fn resolve_with(cli_override: Option<&str>, env_value: Option<&str>) -> Self {
        cli_override
            .or(env_value)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .unwrap_or_else(|| DataSource::Remote(DEFAULT_DATA_URL.to_string()))
    }

    fn fetch_bytes(&self) -> Result<Vec<u8>, AppError> {
        match self {
            DataSource::Local(path) => std::fs::read(path).map_err(|e| {
                AppError::data_unavailable(format!(
                    "Failed to read sales dataset '{}': {e}",
                    path.display()
                ))
            }),
            DataSource::Remote(url) => {
                let client = Client::builder()
                    .timeout(FETCH_TIMEOUT)
                    .build()
                    .map_err(|e| AppError::data_unavailable(format!("HTTP client setup failed: {e}")))?;

                let resp = client
                    .get(url)
                    .send()
                    .map_err(|e| AppError::data_unavailable(format!("Sales dataset request failed: {e}")))?;

                if !resp.status().is_success() {
                    return Err(AppError::data_unavailable(format!(
                        "Sales dataset request failed with status {}.",
                        resp.status()
                    )));
                }

                let body = resp
                    .bytes()
                    .map_err(|e| AppError::data_unavailable(format!("Failed to read sales dataset body: {e}")))?;
                Ok(body.to_vec())
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{url}"),
            DataSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch and parse the dataset. Called once, before any shell is built.
pub fn load(source: &DataSource) -> Result<SalesTable, AppError> {
    let started = Instant::now();
    info!(source = %source, "loading sales dataset");

    let bytes = source.fetch_bytes()?;
    debug!(bytes = bytes.len(), "sales dataset fetched");

    let table = parse_sales_csv(bytes.as_slice())?;
    let (first_year, last_year) = table.year_span().unwrap_or_default();
    info!(
        rows = table.len(),
        first_year,
        last_year,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sales dataset loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::testutil::SAMPLE_CSV;

    /// Serve one canned HTTP response on a loopback port; returns the URL.
    fn serve_once(status: &'static str, body: String) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/sales.csv", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        });
        (url, handle)
    }

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            DataSource::parse("HTTPS://example.com/sales.csv"),
            DataSource::Remote("HTTPS://example.com/sales.csv".to_string())
        );
        assert_eq!(
            DataSource::parse(" data/sales.csv "),
            DataSource::Local(PathBuf::from("data/sales.csv"))
        );
    }

    #[test]
    fn resolve_prefers_cli_then_env_then_default() {
        assert_eq!(
            DataSource::resolve_with(Some("a.csv"), Some("b.csv")),
            DataSource::Local(PathBuf::from("a.csv"))
        );
        assert_eq!(
            DataSource::resolve_with(None, Some("b.csv")),
            DataSource::Local(PathBuf::from("b.csv"))
        );
        assert_eq!(
            DataSource::resolve_with(None, Some("  ")),
            DataSource::Remote(DEFAULT_DATA_URL.to_string())
        );
        assert_eq!(
            DataSource::resolve_with(None, None),
            DataSource::Remote(DEFAULT_DATA_URL.to_string())
        );
    }

    #[test]
    fn load_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        let table = load(&DataSource::Local(file.path().to_path_buf())).unwrap();
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let err = load(&DataSource::Local(PathBuf::from("definitely/not/here.csv"))).unwrap_err();
        assert!(err.is_data_unavailable());
    }

    #[test]
    fn remote_source_is_fetched() {
        let (url, server) = serve_once("200 OK", SAMPLE_CSV.to_string());
        let table = load(&DataSource::parse(&url)).unwrap();
        server.join().unwrap();
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn remote_error_status_is_data_unavailable() {
        let (url, server) = serve_once("404 Not Found", String::new());
        let err = load(&DataSource::Remote(url)).unwrap_err();
        server.join().unwrap();
        assert!(err.is_data_unavailable());
        assert!(err.to_string().contains("404"), "{err}");
    }

    #[test]
    fn remote_truncated_csv_is_data_unavailable() {
        let truncated: String = SAMPLE_CSV.lines().take(2).collect::<Vec<_>>().join("\n");
        let cut = truncated.len() - 20;
        let (url, server) = serve_once("200 OK", truncated[..cut].to_string());
        let err = load(&DataSource::Remote(url)).unwrap_err();
        server.join().unwrap();
        assert!(err.is_data_unavailable());
    }
}
