use std::path::PathBuf;

use clap::Parser;
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "noise-maker")]
#[command(about = "Generate fake access logs for testing", long_about = None)]
pub struct CliArgs {
    /// Number of log lines to write
    #[arg(long, default_value_t = 1000)]
    lines: usize,

    /// Spread the lines over this many past days, ending now
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    days: u32,

    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seed for reproducible request mixes
    #[arg(long)]
    seed: Option<u64>,
}
