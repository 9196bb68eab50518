//! Zipack CLI - Command-line utility for config-driven ZIP packaging.

mod cli;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use zipack_core::ArchiveConfig;
use zipack_core::pack_archive;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let config = ArchiveConfig::load(&cli.config)
        .map_err(|e| error::convert_pack_error(e, &cli.config))?;
    let destination = config.archive_path();

    let report =
        pack_archive(&config).map_err(|e| error::convert_pack_error(e, &cli.config))?;

    formatter.format_pack_result(&destination, &report)?;

    Ok(())
}
