//! CLI argument parsing and configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "zzsdiff")]
#[command(about = "Computes the Zhang-Shasha tree edit distance between two XML documents")]
#[command(version)]
#[command(long_about = "zzsdiff compares the element trees of two XML documents and reports \
the minimum-cost sequence of inserts, removes, and updates that transforms one into the other. \
It treats documents purely as ordered element trees, with no language- or schema-specific \
semantics.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output with detailed logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output with extensive logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compute the tree edit distance between two XML documents
    Diff {
        /// Left (original) XML document
        #[arg(value_name = "LEFT")]
        left: PathBuf,

        /// Right (changed) XML document
        #[arg(value_name = "RIGHT")]
        right: PathBuf,

        /// Output format for the edit script
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Cost charged for inserting an element present only in the right document
        #[arg(long, default_value = "1")]
        insert_weight: u32,

        /// Cost charged for removing an element present only in the left document
        #[arg(long, default_value = "1")]
        remove_weight: u32,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Human-readable text output, one edit per line
    Text,
    /// JSON array of edit operations
    Json,
}
