mod analytics;
mod config;
mod error;
mod invariants;
mod models;
mod notify;
mod parser;
mod report;

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    process::ExitCode,
};

use analytics::Pipeline;
use clap::Parser;
use config::Config;
use error::Error;
use invariants::DayKey;
use notify::{NotificationSink, SendmailSink, StdoutSink};
use report::Report;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Mail a summary of yesterday's successful, human requests from an access log.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML config file; built-in defaults are used without one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Access log to read, overrides the config file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Day to report on as DD-MM-YYYY, defaults to yesterday
    #[arg(long)]
    date: Option<DayKey>,

    /// Print the message to stdout instead of mailing it
    #[arg(long)]
    dry_run: bool,

    /// Fail when the day has no accepted requests instead of sending an empty report
    #[arg(long)]
    require_data: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(path) = args.log_file {
        config.log_file = path;
    }
    let day = args.date.unwrap_or_else(DayKey::yesterday);
    info!(log = %config.log_file.display(), %day, "Parsing access log");

    let results = {
        let file = File::open(&config.log_file).map_err(|source| Error::OpenLog {
            path: config.log_file.clone(),
            source,
        })?;
        Pipeline::from_config(&config).aggregate(BufReader::new(file))?
    };

    if results.is_empty() {
        warn!(log = %config.log_file.display(), "No accepted requests in the whole log");
    }
    for (d, b) in results.days() {
        debug!(day = %d, hits = b.hit_count(), "Day bucket");
    }

    let bucket = if args.require_data {
        Cow::Borrowed(results.require(&day)?)
    } else {
        results.day_or_empty(&day)
    };
    info!(%day, hits = bucket.hit_count(), "Sending report");
    let report = Report::new(&config, day, &bucket);

    if args.dry_run {
        StdoutSink::new(io::stdout().lock()).send(&report)
    } else {
        SendmailSink::new(&config.sendmail).send(&report)
    }
}
