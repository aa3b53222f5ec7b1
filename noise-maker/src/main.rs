mod args;
mod generator;
mod stream;

use std::{
    fs::File,
    io::{self, BufWriter},
    process::ExitCode,
};

use args::CliArgs;
use chrono::Local;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use stream::write_log_stream;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let mut rng = match args.seed() {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_os_rng(),
    };
    let end = Local::now();

    let result = match args.output() {
        Some(path) => File::create(path).and_then(|file| {
            write_log_stream(BufWriter::new(file), &mut rng, *args.lines(), *args.days(), end)
        }),
        None => write_log_stream(io::stdout().lock(), &mut rng, *args.lines(), *args.days(), end),
    };

    match result {
        Ok(()) => {
            if let Some(path) = args.output() {
                eprintln!("Wrote {} log lines to {}", args.lines(), path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to write log lines: {e}");
            ExitCode::FAILURE
        }
    }
}
