#![cfg(not(tarpaulin_include))]

use showcase::{app, config::Config};

/// Main entry point for the web application
///
/// Loads `.env` when present, initialises logging (`RUST_LOG`, default
/// `info`) and serves the showcase and dashboard.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    log::info!(
        "Starting showcase (sheet: {}, script: {})",
        config.csv_url,
        config.script_url
    );

    app::run(config).await
}
