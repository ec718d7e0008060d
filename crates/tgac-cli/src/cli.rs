//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tgac - Resolve Atlantis project metadata from Terragrunt configurations
#[derive(Parser, Debug)]
#[command(name = "tgac")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file applied on top of the global and project settings
    #[arg(short, long, global = true, env = "TGAC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base directory for relative config paths
    #[arg(short = 'C', long, global = true)]
    pub working_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved Atlantis locals of a config as JSON
    ///
    /// Locals of included parent configs are merged in first.
    Locals {
        /// Path to a terragrunt.hcl or terragrunt.hcl.json
        #[arg(value_name = "CONFIG")]
        path: PathBuf,
    },

    /// Print the watch patterns of a directory's local modules
    Watch {
        /// Directory holding the Terraform/OpenTofu files
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Maximum module nesting depth to follow
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Discover every config under a root and report its project metadata as JSON
    Scan {
        /// Repository root to search
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Maximum module nesting depth to follow
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_locals_with_global_flags() {
        let cli = Cli::parse_from(["tgac", "locals", "live/app/terragrunt.hcl", "-v", "-C", "/repo"]);
        assert!(cli.verbose);
        assert_eq!(cli.working_dir, Some(PathBuf::from("/repo")));
        assert_eq!(cli.config, None);
        assert_eq!(
            cli.command,
            Some(Commands::Locals {
                path: PathBuf::from("live/app/terragrunt.hcl")
            })
        );
    }

    #[test]
    fn locals_path_and_settings_file_stay_apart() {
        let cli = Cli::parse_from([
            "tgac",
            "--config",
            "tgac.toml",
            "locals",
            "live/app/terragrunt.hcl",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("tgac.toml")));
        assert_eq!(
            cli.command,
            Some(Commands::Locals {
                path: PathBuf::from("live/app/terragrunt.hcl")
            })
        );
    }

    #[test]
    fn parse_watch_defaults() {
        let cli = Cli::parse_from(["tgac", "watch"]);
        assert_eq!(
            cli.command,
            Some(Commands::Watch {
                dir: PathBuf::from("."),
                max_depth: None,
                json: false
            })
        );
    }

    #[test]
    fn parse_scan_with_depth() {
        let cli = Cli::parse_from(["tgac", "scan", "infra", "--max-depth", "8"]);
        assert_eq!(
            cli.command,
            Some(Commands::Scan {
                root: PathBuf::from("infra"),
                max_depth: Some(8)
            })
        );
    }
}
