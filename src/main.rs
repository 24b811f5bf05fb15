use clap::Parser;
use tickmark::cli::commands::Cli;
use tickmark::cli::handlers;
use tracing_subscriber::EnvFilter;

/// Log filter variable, e.g. `TICK_LOG=debug`
const LOG_ENV: &str = "TICK_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
