//! Scroll Stop CLI
//!
//! Replays scroll scenarios through the edge watcher and prints every transition.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod runner;
mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "scroll-stop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scroll edge watcher scenario runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print every edge transition
    Run {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Also print the classes left on each element
        #[arg(short, long)]
        classes: bool,
    },

    /// Validate a scenario without running it
    Check {
        /// Scenario file (TOML)
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { scenario, classes } => cmd_run(&scenario, classes, cli.verbose),
        Commands::Check { scenario } => cmd_check(&scenario),
    }
}

fn cmd_run(path: &Path, show_classes: bool, verbose: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    info!(
        "Running {} ({} elements, {} steps)",
        path.display(),
        scenario.elements.len(),
        scenario.steps.len()
    );

    let report = runner::run(&scenario, verbose);

    for line in &report.transitions {
        println!("{line}");
    }

    if show_classes {
        println!();
        for (id, classes) in &report.final_classes {
            if classes.is_empty() {
                println!("{id}: -");
            } else {
                println!("{id}: {}", classes.join(" "));
            }
        }
    }

    info!("{} transitions", report.transitions.len());
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    println!(
        "{}: ok ({} elements, {} steps)",
        path.display(),
        scenario.elements.len(),
        scenario.steps.len()
    );
    Ok(())
}
