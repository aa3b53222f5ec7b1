use crate::{analytics::DayBucket, config::Config, invariants::DayKey};

/// Body of the daily mail. Never ends with a newline.
pub fn format_report(day: &DayKey, bucket: &DayBucket) -> String {
    let mut report = format!("Results for {day}\nTotal hits: {}\n", bucket.hit_count());
    for line in bucket.lines() {
        report.push_str(line.as_str());
        report.push('\n');
    }
    report.pop();
    report
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub day: DayKey,
    pub subject: String,
    pub from: String,
    pub to: String,
    pub body: String,
}

impl Report {
    pub fn new(config: &Config, day: DayKey, bucket: &DayBucket) -> Self {
        let body = format_report(&day, bucket);
        Self {
            day,
            subject: config.subject.clone(),
            from: config.sender.clone(),
            to: config.recipient.clone(),
            body,
        }
    }

    /// Plain-text mail message, headers first, as handed to the mail relay.
    pub fn to_message(&self) -> String {
        format!(
            "From: {}\nTo: {}\nSubject: {}\nMIME-Version: 1.0\n\
             Content-Type: text/plain; charset=utf-8\nContent-Transfer-Encoding: 8bit\n\n{}\n",
            self.from, self.to, self.subject, self.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::ResultSet;
    use crate::models::ParsedRequest;
    use asserting::prelude::*;
    use chrono::DateTime;

    fn bucket_with(requests: &[&str]) -> (DayKey, DayBucket) {
        let mut result = ResultSet::default();
        let day: DayKey = "14-03-2024".parse().unwrap();
        for request in requests {
            let parsed = ParsedRequest {
                client_ip: "203.0.113.7".into(),
                timestamp: DateTime::parse_from_rfc3339("2024-03-14T08:15:02+00:00").unwrap(),
                request_line: request.to_string(),
                status_code: 200,
                user_agent: "Mozilla/5.0".into(),
            };
            result.record(parsed.day(), (&parsed).into());
        }
        let bucket = result.day_or_empty(&day).into_owned();
        (day, bucket)
    }

    #[test]
    fn report_lists_lines_without_trailing_newline() {
        let (day, bucket) = bucket_with(&["GET /a HTTP/1.1", "GET /b HTTP/1.1"]);
        assert_that!(format_report(&day, &bucket)).is_equal_to(
            "Results for 14-03-2024\nTotal hits: 2\n\
             203.0.113.7 : 200 : GET /a HTTP/1.1 : Mozilla/5.0\n\
             203.0.113.7 : 200 : GET /b HTTP/1.1 : Mozilla/5.0"
                .to_string(),
        );
    }

    #[test]
    fn empty_day_stops_after_header() {
        let (day, bucket) = bucket_with(&[]);
        assert_that!(format_report(&day, &bucket))
            .is_equal_to("Results for 14-03-2024\nTotal hits: 0".to_string());
    }

    #[test]
    fn message_carries_configured_addresses() {
        let (day, bucket) = bucket_with(&["GET / HTTP/1.1"]);
        let config = Config {
            sender: "digest@example.org".into(),
            recipient: "ops@example.org".into(),
            ..Config::default()
        };
        let report = Report::new(&config, day, &bucket);
        let message = report.to_message();
        assert_that!(message.starts_with(
            "From: digest@example.org\nTo: ops@example.org\nSubject: Daily access.log parse results\n"
        ))
        .is_true();
        assert_that!(message.contains(
            "\nMIME-Version: 1.0\nContent-Type: text/plain; charset=utf-8\nContent-Transfer-Encoding: 8bit\n\n"
        ))
        .is_true();
        assert_that!(message.ends_with("\n\nResults for 14-03-2024\nTotal hits: 1\n203.0.113.7 : 200 : GET / HTTP/1.1 : Mozilla/5.0\n"))
            .is_true();
    }
}
