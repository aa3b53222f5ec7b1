use std::{borrow::Cow, collections::HashMap, io::BufRead};

use tracing::{info, warn};

use crate::{
    config::Config,
    error::Error,
    invariants::DayKey,
    models::AcceptedRecord,
    parser::{LineFilter, ParseError, parse_line},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DayBucket {
    hit_count: usize,
    lines: Vec<AcceptedRecord>,
}

impl DayBucket {
    fn record(&mut self, record: AcceptedRecord) {
        self.hit_count += 1;
        self.lines.push(record);
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    /// Accepted lines in log order.
    pub fn lines(&self) -> &[AcceptedRecord] {
        &self.lines
    }
}

/// Day buckets of one pass over a log. Only days with accepted lines are present.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultSet {
    days: HashMap<DayKey, DayBucket>,
}

impl ResultSet {
    pub fn record(&mut self, day: DayKey, record: AcceptedRecord) {
        self.days.entry(day).or_default().record(record);
    }

    pub fn get(&self, day: &DayKey) -> Option<&DayBucket> {
        self.days.get(day)
    }

    /// Lookup that treats an absent day as an empty one, without storing it.
    pub fn day_or_empty(&self, day: &DayKey) -> Cow<'_, DayBucket> {
        self.get(day)
            .map_or_else(|| Cow::Owned(DayBucket::default()), Cow::Borrowed)
    }

    /// Lookup that refuses to report on a day with no accepted lines.
    pub fn require(&self, day: &DayKey) -> Result<&DayBucket, Error> {
        self.get(day)
            .ok_or_else(|| Error::NoDataForDay(day.clone()))
    }

    pub fn days(&self) -> impl Iterator<Item = (&DayKey, &DayBucket)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Parse, filter and bucket an access log in a single forward pass.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    filter: LineFilter,
    strict_timestamps: bool,
}

impl Pipeline {
    pub fn new(filter: LineFilter, strict_timestamps: bool) -> Self {
        Self {
            filter,
            strict_timestamps,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(LineFilter::from_config(config), config.strict_timestamps)
    }

    pub fn aggregate<R: BufRead>(&self, mut reader: R) -> Result<ResultSet, Error> {
        let mut result = ResultSet::default();
        let mut buf = Vec::new();
        let mut line_no = 0usize;
        let (mut accepted, mut rejected, mut unparseable) = (0usize, 0usize, 0usize);

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(Error::ReadLog)? == 0 {
                break;
            }
            line_no += 1;
            // binary garbage becomes an unparseable line, not a read failure
            let decoded = String::from_utf8_lossy(&buf);
            let line = decoded.trim_end_matches(['\n', '\r']);

            match parse_line(line) {
                Ok(parsed) if self.filter.accept(&parsed) => {
                    result.record(parsed.day(), AcceptedRecord::from(&parsed));
                    accepted += 1;
                }
                Ok(_) => rejected += 1,
                Err(ParseError::Timestamp { raw, source }) if self.strict_timestamps => {
                    return Err(Error::Timestamp {
                        line: line_no,
                        raw,
                        source,
                    });
                }
                Err(e) => {
                    warn!(line_no, reason = %e, "Can not parse line: {line}");
                    unparseable += 1;
                }
            }
        }

        info!(
            lines = line_no,
            accepted,
            rejected,
            unparseable,
            days = result.len(),
            "Finished parsing access log"
        );
        Ok(result)
    }
}
