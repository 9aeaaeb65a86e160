use anyhow::Result;
use shared_borders::{extract_borders, BorderOptions};
use tracing::info;

pub fn run(cli: &crate::cli::Cli) -> Result<()> {
    let options = BorderOptions { key: cli.key.clone(), use_index: !cli.no_index };

    info!("[extract] reading regions from {}", cli.input.display());
    let summary = extract_borders(&cli.input, &cli.output, &options)?;

    info!(
        "[extract] {} features, {} regions ({} skipped), {} borders",
        summary.features, summary.regions, summary.skipped, summary.borders,
    );
    Ok(())
}
