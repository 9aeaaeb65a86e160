mod cli;
mod commands;

use cli::Cli;
use commands::extract;

/// Map the `-v` count onto a log level: INFO, DEBUG, then TRACE.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    extract::run(&cli)
}

fn main() -> anyhow::Result<()> { run() }
