use std::{num::ParseIntError, sync::LazyLock};

use chrono::DateTime;
use regex::Regex;
use thiserror::Error;

use crate::{config::Config, models::ParsedRequest};

// <server> <client-ip> - - [<timestamp>] (<N> s) "<request>" <status> <size> "<referer>" "<agent>"
static LOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\S+\s", // server name
        r"(?P<client_ip>[0-9a-f:.]+)",
        r"\s-\s-\s", // remote logname + user
        r"\[(?P<timestamp>.+?)\]\s",
        r"\([0-9]+\ss\)\s", // processing time
        r#""(?P<request>.+?)"\s"#,
        r"(?P<status>[0-9]+)\s",
        r"(?:-|[0-9]+)\s", // response size
        r#"".+?"\s"#,     // referer
        r#""(?P<user_agent>.+)""#, // greedy, agents may contain quotes
    ))
    .expect("valid log line pattern")
});

// Timestamp format for log entries: [14/Mar/2024:08:15:02 +0000]
const TS_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Why a single line produced no request. None of these end a run on their own.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line does not match the access log format")]
    NoMatch,

    #[error("malformed timestamp {raw:?}: {source}")]
    Timestamp {
        raw: String,
        source: chrono::ParseError,
    },

    #[error("status code {raw:?} out of range: {source}")]
    Status { raw: String, source: ParseIntError },
}

pub fn parse_line(line: &str) -> Result<ParsedRequest, ParseError> {
    let caps = LOG_LINE.captures(line).ok_or(ParseError::NoMatch)?;

    let raw_ts = &caps["timestamp"];
    let timestamp =
        DateTime::parse_from_str(raw_ts, TS_FORMAT).map_err(|source| ParseError::Timestamp {
            raw: raw_ts.into(),
            source,
        })?;
    let raw_status = &caps["status"];
    let status_code = raw_status.parse().map_err(|source| ParseError::Status {
        raw: raw_status.into(),
        source,
    })?;

    Ok(ParsedRequest {
        client_ip: caps["client_ip"].into(),
        timestamp,
        request_line: caps["request"].into(),
        status_code,
        user_agent: caps["user_agent"].into(),
    })
}

/// Decides which parsed requests make it into the report.
#[derive(Debug, Clone)]
pub struct LineFilter {
    junk_agents: Vec<String>,
    request_exclusions: Vec<String>,
}

impl Default for LineFilter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl LineFilter {
    pub fn new<A, R>(junk_agents: A, request_exclusions: R) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        // an empty needle would match every line
        Self {
            junk_agents: junk_agents
                .into_iter()
                .map(|a| a.as_ref().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
            request_exclusions: request_exclusions
                .into_iter()
                .map(|r| r.as_ref().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.junk_agents, &config.request_exclusions)
    }

    /// Bots, crawlers and scripted clients, matched case-insensitively anywhere in the agent.
    pub fn is_junk_agent(&self, user_agent: &str) -> bool {
        let agent = user_agent.to_lowercase();
        self.junk_agents
            .iter()
            .any(|junk| agent.contains(junk.as_str()))
    }

    pub fn is_excluded_request(&self, request_line: &str) -> bool {
        self.request_exclusions
            .iter()
            .any(|needle| request_line.contains(needle.as_str()))
    }

    pub fn accept(&self, parsed: &ParsedRequest) -> bool {
        !self.is_junk_agent(&parsed.user_agent)
            && !self.is_excluded_request(&parsed.request_line)
            && (200..=299).contains(&parsed.status_code)
    }
}
