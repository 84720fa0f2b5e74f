use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, ShowcaseError};

/// Published spreadsheet the showcase reads from.
pub const DEFAULT_SHEET_ID: &str = "1WdwQ3QgxNO8NqH54gHI_xQh-UM3tmByusA71ScqJqiI";

/// Deployed script that lists and edits projects for the dashboard.
pub const DEFAULT_SCRIPT_URL: &str = "https://script.google.com/macros/s/AKfycbz_krPleue-HaApN508KMXyNpyvvKMnJkV3CclFhomAEzHLGX9nwOjzh8oaaIuUSz_q/exec";

/// CSV export URL of a published spreadsheet.
pub fn sheet_csv_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv")
}

/// Runtime configuration.
///
/// | Env Var                          | Default                       |
/// |----------------------------------|-------------------------------|
/// | `SHOWCASE_HOST`                  | `127.0.0.1`                   |
/// | `SHOWCASE_PORT`                  | `3000`                        |
/// | `SHOWCASE_CSV_URL`               | export URL of the default sheet |
/// | `SHOWCASE_SCRIPT_URL`            | [`DEFAULT_SCRIPT_URL`]        |
/// | `SHOWCASE_REQUEST_TIMEOUT_SECS`  | `30` (`0` = no timeout)       |
/// | `SHOWCASE_REFRESH_DELAY_MS`      | `1000`                        |
/// | `SHOWCASE_STATIC_DIR`            | `static`                      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub csv_url: String,
    pub script_url: String,
    pub request_timeout: Option<Duration>,
    /// Pause after a write before the dashboard re-fetches the list.
    pub refresh_delay: Duration,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            csv_url: sheet_csv_url(DEFAULT_SHEET_ID),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            refresh_delay: Duration::from_millis(1000),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to [`Config::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let host = lookup("SHOWCASE_HOST").unwrap_or(defaults.host);
        let port = parse_or("SHOWCASE_PORT", &lookup, defaults.port)?;
        let csv_url = url_or("SHOWCASE_CSV_URL", &lookup, defaults.csv_url)?;
        let script_url = url_or("SHOWCASE_SCRIPT_URL", &lookup, defaults.script_url)?;

        let timeout_secs: u64 = parse_or("SHOWCASE_REQUEST_TIMEOUT_SECS", &lookup, 30)?;
        let request_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let refresh_ms: u64 = parse_or("SHOWCASE_REFRESH_DELAY_MS", &lookup, 1000)?;

        let static_dir = lookup("SHOWCASE_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Ok(Self {
            host,
            port,
            csv_url,
            script_url,
            request_timeout,
            refresh_delay: Duration::from_millis(refresh_ms),
            static_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ShowcaseError::Config(format!("{key} is not a valid number: {raw:?}"))),
    }
}

fn url_or<F>(key: &str, lookup: &F, default: String) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => {
            Err(ShowcaseError::Config(format!("{key} must not be empty")))
        }
        Some(raw) => Ok(raw.trim().to_string()),
    }
}
