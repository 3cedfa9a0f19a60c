//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// Skillset - hybrid semantic + graph search over agent skills
#[derive(Parser, Debug)]
#[command(name = "sks")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable JSON output for machine consumption
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: $SKS_ROOT/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the sks root directory
    Init(commands::init::InitArgs),

    /// Reindex skills from configured paths
    Index(commands::index::IndexArgs),

    /// Search for skills
    Search(commands::search::SearchArgs),

    /// Recommend skills for a project or seed skill
    Recommend(commands::recommend::RecommendArgs),

    /// Show skills related to a given skill
    Related(commands::related::RelatedArgs),

    /// Show skill details
    Show(commands::show::ShowArgs),

    /// List indexed skills grouped by category
    List(commands::list::ListArgs),

    /// Show index statistics
    Stats(commands::stats::StatsArgs),
}
