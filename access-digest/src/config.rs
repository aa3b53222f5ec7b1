use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::Error;

pub const DEFAULT_JUNK_AGENTS: [&str; 22] = [
    "googlebot",
    "wordpress",
    "yandexbot",
    "bingbot",
    "petalbot",
    "dotbot",
    "internal dummy connection",
    "semrushbot",
    "bytespider",
    "barkrowler",
    "telegrambot",
    "seznambot",
    "ccbot",
    "amazonbot",
    "mail.ru_bot",
    "go-http-client",
    "scaninfo@paloaltonetworks.com",
    "mauibot",
    "smtbot",
    "thinkbot",
    "go http package",
    "netsystemsresearch.com",
];

pub const DEFAULT_REQUEST_EXCLUSIONS: [&str; 3] = ["wp-", "xmlrpc", "favicon"];

/// Everything a run needs that is not read from the log itself.
///
/// Every key is optional in the TOML file; missing keys take the defaults.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_file: PathBuf,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    /// Local mail relay program, invoked as `<sendmail> -t -oi`.
    pub sendmail: PathBuf,
    /// Case-insensitive substrings of bot and tool user agents.
    pub junk_agents: Vec<String>,
    /// Case-sensitive substrings of request lines to drop.
    pub request_exclusions: Vec<String>,
    /// Abort the run on a malformed timestamp instead of skipping the line.
    pub strict_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("/srv/data/logs/access.log"),
            sender: "parser@localhost".into(),
            recipient: "root@localhost".into(),
            subject: "Daily access.log parse results".into(),
            sendmail: PathBuf::from("/usr/sbin/sendmail"),
            junk_agents: DEFAULT_JUNK_AGENTS.iter().map(|s| s.to_string()).collect(),
            request_exclusions: DEFAULT_REQUEST_EXCLUSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strict_timestamps: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = raw.parse::<Self>().map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Header values end up verbatim in the mail, so line breaks are refused.
    pub fn validate(&self) -> Result<(), Error> {
        for (key, value) in [
            ("sender", &self.sender),
            ("recipient", &self.recipient),
            ("subject", &self.subject),
        ] {
            if value.contains(['\r', '\n']) {
                return Err(Error::ConfigValue {
                    key,
                    reason: "must not contain line breaks",
                });
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.junk_agents.len(), 22);
        assert_eq!(config.request_exclusions, vec!["wp-", "xmlrpc", "favicon"]);
        assert_that!(config).is_equal_to(Config::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config: Config = r#"
            recipient = "ops@example.org"
            junk_agents = ["curl"]
            strict_timestamps = true
        "#
        .parse()
        .unwrap();
        assert_eq!(config.recipient, "ops@example.org");
        assert_eq!(config.junk_agents, vec!["curl"]);
        assert_that!(config.strict_timestamps).is_true();
        assert_eq!(config.sender, Config::default().sender);
    }

    #[test]
    fn header_values_with_line_breaks_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", r#"recipient = "ops@example.org\nBcc: someone@example.net""#).unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert_that!(matches!(err, Error::ConfigValue { key: "recipient", .. })).is_true();

        let config = Config {
            subject: "daily\r\nX-Injected: yes".into(),
            ..Config::default()
        };
        assert_that!(matches!(config.validate(), Err(Error::ConfigValue { key: "subject", .. })))
            .is_true();
        assert_that!(Config::default().validate().is_ok()).is_true();
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert_that!("recipients = []".parse::<Config>().is_err()).is_true();
    }

    #[test]
    fn load_reports_path_on_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "sender = 42").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert_that!(matches!(err, Error::ConfigParse { .. })).is_true();

        let missing = Config::load(Path::new("/nonexistent/access-digest.toml")).unwrap_err();
        assert_that!(matches!(missing, Error::ConfigRead { .. })).is_true();
    }
}
