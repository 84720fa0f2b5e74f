#![cfg(not(tarpaulin_include))]

use showcase::analytics::{DashboardSummary, TOP_SOFTWARE_LIMIT};
use showcase::client::{SheetClient, http_client};
use showcase::config::Config;
use showcase::loader::from_csv;
use showcase::theme::build_cards;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <csv-file | http(s)-url>", args[0]);
        return Ok(());
    }
    let source = &args[1];

    let projects = if source.starts_with("http://") || source.starts_with("https://") {
        let config = Config::from_env()?;
        SheetClient::new(http_client(config.request_timeout)?, source.as_str())
            .fetch_projects()
            .await?
    } else {
        from_csv(source)?
    };

    let summary = DashboardSummary::from_projects(&projects);

    println!("Projects:       {}", summary.total);
    println!("Showcase cards: {}", build_cards(&projects).len());
    println!("Top category:   {}", summary.top_category_label());
    println!();
    println!("Categories:");
    for label in summary.types.labels_with_counts() {
        println!("  {}", label);
    }
    println!();
    println!("Top {} technologies:", TOP_SOFTWARE_LIMIT);
    if summary.top_software.is_empty() {
        println!("  (none)");
    }
    for (rank, usage) in summary.top_software.iter().enumerate() {
        println!("  {}. {} ({})", rank + 1, usage.name, usage.count);
    }

    Ok(())
}
