use chrono::{DateTime, FixedOffset};
use derive_more::{AsRef, Display};

use crate::invariants::DayKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub client_ip: String,
    pub timestamp: DateTime<FixedOffset>,
    pub request_line: String,
    pub status_code: u16,
    pub user_agent: String,
}

impl ParsedRequest {
    /// Calendar day in the offset the timestamp was logged with.
    pub fn day(&self) -> DayKey {
        self.timestamp.date_naive().into()
    }
}

/// Display line of a request that passed every filter.
#[derive(Debug, Display, AsRef, Clone, PartialEq, Eq)]
pub struct AcceptedRecord(String);

impl AcceptedRecord {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&ParsedRequest> for AcceptedRecord {
    fn from(value: &ParsedRequest) -> Self {
        Self(format!(
            "{} : {} : {} : {}",
            value.client_ip, value.status_code, value.request_line, value.user_agent
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;
    use chrono::TimeZone;

    #[test]
    fn day_uses_logged_offset() {
        let request = ParsedRequest {
            client_ip: "10.0.0.1".into(),
            timestamp: FixedOffset::east_opt(2 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 1, 1, 0, 30, 0)
                .unwrap(),
            request_line: "GET / HTTP/1.1".into(),
            status_code: 200,
            user_agent: "Mozilla/5.0".into(),
        };
        // 22:30 UTC on the 31st, but the bucket follows the log's own offset
        assert_that!(request.day().to_string()).is_equal_to("01-01-2024".to_string());
        assert_that!(AcceptedRecord::from(&request).to_string())
            .is_equal_to("10.0.0.1 : 200 : GET / HTTP/1.1 : Mozilla/5.0".to_string());
    }
}
