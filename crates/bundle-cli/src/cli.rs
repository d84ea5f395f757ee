//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bundle registry - track which archive provides which package
#[derive(Parser, Debug)]
#[command(name = "bundlectl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Where to find archives, configuration and the catalog.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceArgs {
    /// Directory of archives (not recursed)
    #[arg(short, long, env = "BUNDLE_WATCH_DIR")]
    pub dir: Option<PathBuf>,

    /// Configuration file (.toml, .json or .yaml)
    #[arg(short, long, env = "BUNDLE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Watch the directory and keep the catalog up to date until Ctrl+C
    Watch {
        #[command(flatten)]
        service: ServiceArgs,

        /// Catalog file; the extension selects the format
        #[arg(long, env = "BUNDLE_CATALOG")]
        catalog: Option<PathBuf>,

        /// Delay before re-checking an archive that is still being written
        #[arg(long)]
        retry_delay_ms: Option<u64>,
    },

    /// Scan the directory once, write the catalog and list the bundles
    Scan {
        #[command(flatten)]
        service: ServiceArgs,

        /// Catalog file; the extension selects the format
        #[arg(long, env = "BUNDLE_CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// Print the archive providing a package
    ///
    /// Exits with status 1 and prints `none` when nothing matches.
    ///
    /// Examples:
    ///   bundlectl resolve util.io
    ///   bundlectl resolve util.io --range "[1.0.0,2.0.0)"
    Resolve {
        /// Package name
        package: String,

        /// Required version or version range; any version when omitted
        #[arg(short, long)]
        range: Option<String>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Show how each import of an archive resolves
    Imports {
        /// Archive path, absolute or relative to the bundle directory
        archive: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,
    },
}
