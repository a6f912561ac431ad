//! fwcopy - copies a compiled framework into the build products directory,
//! strips architecture slices the build target does not need, and re-signs
//! the result when the build allows it.
//!
//! Meant to be invoked as a build phase; all inputs come from the build
//! system's environment plus one --framework flag.
#![allow(dead_code)]

mod config;
mod copy;
mod error;
mod lipo;
mod pipeline;
mod process;
mod sign;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::PipelineConfig;
use pipeline::XcodeTools;

#[derive(Parser)]
#[command(name = "fwcopy")]
#[command(about = "Copy, thin, and re-sign framework bundles during a build")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a framework into the build products, stripping slices as needed
    CopyFrameworks {
        /// The framework to copy, strip, and sign (e.g. "Demo.framework")
        #[arg(long)]
        framework: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present; useful when running outside the build system.
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::CopyFrameworks { framework } => {
            // Config errors must surface before anything touches the filesystem.
            let config = PipelineConfig::from_env(&framework)?;
            XcodeTools::preflight()?;

            let report = pipeline::run(&config, &XcodeTools)?;
            if report.stripped.is_empty() {
                println!("{framework}: nothing to strip");
            }
            println!("{framework}: done");
        }
    }

    Ok(())
}
