//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cacheprobe - Local CI readiness checks.
#[derive(Debug, Parser)]
#[command(name = "cacheprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .cacheprobe.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the probes and write a report (default if no command specified)
    Run(RunArgs),

    /// List the probes in execution order
    List(ListArgs),

    /// Show the cache directories and their sizes
    Inventory(InventoryArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Directory for the JSON report (defaults to the project root)
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Do not write a report file
    #[arg(long)]
    pub no_report: bool,

    /// Run only specified probes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip specified probes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Print the report as JSON on stdout instead of progress output
    #[arg(long)]
    pub json: bool,

    /// Python interpreter to probe
    #[arg(long, value_name = "PATH")]
    pub python: Option<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `inventory` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InventoryArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Whether the selected command prints machine-readable output.
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Some(Commands::Run(args)) => args.json,
            Some(Commands::List(args)) => args.json,
            Some(Commands::Inventory(args)) => args.json,
            None => false,
        }
    }
}
