//! Sanad CLI binary.

use std::process;

use clap::Parser;
use sanad::cli::{args::SanadArgs, commands::execute_command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = SanadArgs::parse();

    // RUST_LOG wins when set; otherwise the verbosity flags decide.
    let default_level = match args.verbosity() {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("sanad={default_level}"))),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
