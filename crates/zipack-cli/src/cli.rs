//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;
use zipack_core::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "zipack")]
#[command(author, version, about = "Config-driven ZIP packaging utility", long_about = None)]
pub struct Cli {
    /// Path to the packaging config file
    #[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let cli = Cli::parse_from(["zipack"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.json);
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = Cli::parse_from(["zipack", "deploy/pack.json", "--json"]);
        assert_eq!(cli.config, PathBuf::from("deploy/pack.json"));
        assert!(cli.json);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["zipack", "--quiet", "--verbose"]);
        assert!(result.is_err());
    }
}
