use std::io::{self, Write};

use chrono::{DateTime, Local, TimeDelta};
use rand::Rng;

use crate::generator::generate_line;

const SECONDS_PER_DAY: i64 = 86_400;

/// Write `lines` log lines with timestamps rising evenly from `days` days ago up to `end`.
pub fn write_log_stream<W: Write, R: Rng + ?Sized>(
    mut out: W,
    rng: &mut R,
    lines: usize,
    days: u32,
    end: DateTime<Local>,
) -> io::Result<()> {
    let span = i64::from(days) * SECONDS_PER_DAY;
    let start = end - TimeDelta::seconds(span);
    let step = span / lines.max(1) as i64;

    for i in 0..lines {
        let jitter = rng.random_range(0..step.max(1));
        let moment = start + TimeDelta::seconds(step * i as i64 + jitter);
        writeln!(out, "{}", generate_line(rng, moment))?;
    }
    out.flush()
}
