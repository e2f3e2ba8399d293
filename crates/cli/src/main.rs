//! Command-line entry point.
//!
//! Usage: `freight-quote [BASKET.json]`. Reads the basket from stdin when no
//! file is given and prints the quote as JSON on stdout.

use std::io::Read;
use std::process::ExitCode;

use fulfillment::FreightConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn read_input(path: Option<String>) -> cli::Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn main() -> ExitCode {
    let config = FreightConfig::from_env();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let output = read_input(std::env::args().nth(1)).and_then(|input| cli::run(&input, &config));
    match output {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "quote failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
