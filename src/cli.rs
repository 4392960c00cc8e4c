//! CLI argument parsing for the cut inspection binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pidcut")]
#[command(version)]
#[command(about = "Inspect n-sigma PID cut configurations", long_about = None)]
pub struct Cli {
    /// Emit library diagnostics on stderr
    #[arg(long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a cut configuration and print the resulting table
    Show {
        /// TOML cut configuration file
        config: PathBuf,
    },

    /// Tabulate the effective TPC electron band limits against momentum,
    /// with the run corrections applied
    Band {
        /// TOML cut configuration file
        config: PathBuf,

        /// Run number to refresh the correction registry for
        #[arg(long, default_value = "0")]
        run: u32,

        /// Pseudorapidity at which the eta correction is sampled
        #[arg(long, default_value = "0.0")]
        eta: f64,

        /// Lowest tabulated momentum (GeV/c)
        #[arg(long = "p-min", default_value = "0.2")]
        p_min: f64,

        /// Highest tabulated momentum (GeV/c)
        #[arg(long = "p-max", default_value = "10.0")]
        p_max: f64,

        /// Number of tabulated momentum points
        #[arg(long, default_value = "20")]
        steps: usize,
    },
}
