//! zzsdiff CLI
//!
//! Command-line front-end over the `tree-diff` engine and the `xml-tree` adapter: loads two
//! XML documents, computes their tree edit distance, and renders the resulting script.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing_subscriber::{self, EnvFilter};

mod cli;
mod output;

use cli::{Cli, Commands, OutputFormat};
use xml_tree::StructuralCost;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("zzsdiff={log_level}")))
        .with_target(false)
        .with_level(false)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = run(&cli);

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(ref error) => {
            if cli.debug {
                eprintln!("{} {:?}", "Error:".red().bold(), error);
            } else {
                eprintln!("{} {}", "Error:".red().bold(), error);
                if !cli.verbose {
                    eprintln!(
                        "{} Run with {} for more details",
                        "Hint:".yellow().bold(),
                        "--debug".cyan()
                    );
                }
            }
            std::process::exit(2);
        }
    }
}

/// Runs the requested subcommand and returns the process exit code on success.
fn run(cli: &Cli) -> Result<i32> {
    let Commands::Diff {
        left,
        right,
        format,
        insert_weight,
        remove_weight,
    } = &cli.command;

    tracing::info!(left = %left.display(), right = %right.display(), "loading documents");

    let left_text = xml_tree::read_to_string(left)
        .with_context(|| format!("loading left document {}", left.display()))?;
    let right_text = xml_tree::read_to_string(right)
        .with_context(|| format!("loading right document {}", right.display()))?;

    let left_doc = xml_tree::parse(&left_text)
        .with_context(|| format!("parsing left document {}", left.display()))?;
    let right_doc = xml_tree::parse(&right_text)
        .with_context(|| format!("parsing right document {}", right.display()))?;

    let cost = StructuralCost::new(*insert_weight, *remove_weight);

    tracing::debug!("computing tree edit distance");
    let edits = tree_diff::distance(
        Some(left_doc.root_element()),
        Some(right_doc.root_element()),
        |n| xml_tree::children(n),
        |n| cost.insert_cost(n),
        |n| cost.remove_cost(n),
        |a, b| cost.update_cost(a, b),
    )
    .context("computing tree edit distance")?;

    let total = output::total_cost(&edits, &cost);

    let rendered = match format {
        OutputFormat::Text => output::render_text(&edits, &cost),
        OutputFormat::Json => output::render_json(&edits, &cost).context("rendering edit script as JSON")?,
    };
    print!("{rendered}");
    if matches!(format, OutputFormat::Json) {
        println!();
    }

    if !cli.quiet {
        tracing::info!(total_cost = total, "done");
    }

    Ok(if total == 0 { 0 } else { 1 })
}
