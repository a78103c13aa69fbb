//! Example: load the industry dashboard feed with a progress readout.
//!
//! # Usage
//!
//! ```bash
//! # From a local JSON file (for testing)
//! cargo run --example industry_feed -- local path/to/industry-data.json
//!
//! # From the backend named by WORLDSUN_API_BASE_URL
//! WORLDSUN_API_BASE_URL=https://api.example.com cargo run --example industry_feed -- http
//! ```

use std::env;
use std::io::Write;

use tracing_subscriber::EnvFilter;
use worldsun_data::industry::{
    fetch_industry_data, sort_industries, split_benchmark, IndustryData, SortConfig, SortKey,
};
use worldsun_data::streaming::{FetchTransport, HttpTransport, LocalTransport};
use worldsun_data::ClientConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = ClientConfig::from_env()?;

    let transport: Box<dyn FetchTransport> = match args.get(1).map(String::as_str) {
        Some("local") => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: industry_feed local <path>");
                std::process::exit(1);
            };
            Box::new(LocalTransport::open(path)?)
        }
        Some("http") => Box::new(HttpTransport::with_config(config.http_config())?),
        _ => {
            eprintln!("Usage: industry_feed <local <path>|http>");
            std::process::exit(1);
        }
    };

    let rows = fetch_industry_data(transport.as_ref(), &config, |pct| {
        eprint!("\rLoading... {pct:>3}%");
        let _ = std::io::stderr().flush();
    })?;
    eprintln!();

    let (benchmark, industries) = split_benchmark(rows);
    if let Some(benchmark) = &benchmark {
        print_row("Benchmark", benchmark);
    }

    let sort = SortConfig::default().request_sort(SortKey::OneYear).request_sort(SortKey::OneYear);
    println!("Industries by 1Y return{}:", sort.indicator(SortKey::OneYear).unwrap_or(""));
    for row in sort_industries(&industries, sort) {
        print_row("", &row);
    }

    Ok(())
}

fn print_row(label: &str, row: &IndustryData) {
    let one_year = row
        .etf_roi
        .as_ref()
        .and_then(|r| r.one_year)
        .map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}%"));
    println!("{label:>10} {:<32} {one_year:>10}", row.industry_name);
}
