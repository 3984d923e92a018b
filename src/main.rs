use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{HumanBytes, HumanCount};
use log::{debug, info};

use hash_dups::logging::init_logging;
use hash_dups::{
    Cli, Config, FileHasher, ScanProgress, format_human_elapsed, group_files, log_summary,
    resolve_interactively, write_report,
};

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);
    init_logging(config.verbose).context("Failed to initialize logging")?;

    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    debug!("Command line arguments: {:?}", cli);
    debug!("Effective configuration: {:?}", config);

    let mut hasher = FileHasher::new(config.block_size);
    let progress = ScanProgress::new(config.quiet);
    let index = group_files(&cli.paths, cli.like.as_deref(), &mut hasher, &progress)
        .context("Scan failed")?;
    info!(
        "Read {} files ({})",
        HumanCount(hasher.files_read()),
        HumanBytes(hasher.bytes_read())
    );

    let duplicates = index.duplicates();
    log_summary(&duplicates);

    write_report(&duplicates, cli.output.as_deref(), cli.size, io::stdout().lock()).with_context(|| {
        match &cli.output {
            Some(file_name) => format!("Failed to write output file: '{}'", file_name.display()),
            None => "Failed to write to standard output".to_string(),
        }
    })?;

    if !cli.no_interactive && !duplicates.is_empty() {
        let summary = resolve_interactively(&duplicates, io::stdin().lock(), io::stdout().lock())
            .context("Interactive resolution failed")?;
        info!(
            "Deleted {} files ({} groups skipped, {} invalid selections, {} failed deletions)",
            summary.deleted, summary.skipped, summary.rejected, summary.failed
        );
    }

    info!("Completed in {}", format_human_elapsed(start_time.elapsed()));
    Ok(())
}
