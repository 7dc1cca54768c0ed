use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use reqwest::Url;
use serde::Deserialize;
use taskpulse_parser::{ColumnResolver, ColumnSynonyms, DateParser, ExplicitFormats};

use crate::departments::{Classifier, Department, DepartmentRule};
use crate::error::ConfigError;

/// Published CSV export of the tracker sheet.
pub const DEFAULT_SOURCE_URL: &str =
    "https://docs.google.com/spreadsheets/d/e/2PACX-1vR4tracker-export/pub?gid=0&single=true&output=csv";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_SOURCE_URL: &str = "TASKPULSE_SOURCE_URL";
pub const ENV_TIMEZONE: &str = "TASKPULSE_TIMEZONE";
pub const ENV_CONFIG_PATH: &str = "TASKPULSE_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepartmentKeywords {
    pub department: Department,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source_url: String,
    pub timeout_secs: u64,
    /// IANA zone defining "today"; system local time when unset.
    pub timezone: Option<String>,
    /// Replaces the built-in keyword table, in the given order.
    pub departments: Vec<DepartmentKeywords>,
    pub date_formats: Option<Vec<String>>,
    pub columns: Option<ColumnSynonyms>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            timezone: None,
            departments: Vec::new(),
            date_formats: None,
            columns: None,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Applies `TASKPULSE_*` overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SOURCE_URL).filter(|v| !v.trim().is_empty()) {
            self.source_url = url.trim().to_string();
        }
        if let Some(tz) = lookup(ENV_TIMEZONE).filter(|v| !v.trim().is_empty()) {
            self.timezone = Some(tz.trim().to_string());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.source_url).map_err(|err| ConfigError::SourceUrl {
            url: self.source_url.clone(),
            message: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::SourceUrl {
                url: self.source_url.clone(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        self.clock()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn clock(&self) -> Result<Clock, ConfigError> {
        match self.timezone.as_deref() {
            None => Ok(Clock::SystemLocal),
            Some(name) => name
                .parse::<Tz>()
                .map(Clock::Zone)
                .map_err(|_| ConfigError::Timezone(name.to_string())),
        }
    }

    pub fn classifier(&self) -> Classifier {
        if self.departments.is_empty() {
            return Classifier::default();
        }
        Classifier::new(
            self.departments
                .iter()
                .map(|entry| DepartmentRule::new(entry.department, &entry.keywords))
                .collect(),
        )
    }

    pub fn date_parser(&self) -> DateParser {
        match &self.date_formats {
            Some(formats) => DateParser::with_formats(ExplicitFormats::new(formats.iter().cloned())),
            None => DateParser::default(),
        }
    }

    pub fn column_resolver(&self) -> ColumnResolver {
        ColumnResolver::new(self.columns.clone().unwrap_or_default())
    }
}

/// Source of the reference moment for overdue and next-deadline calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clock {
    SystemLocal,
    Zone(Tz),
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::SystemLocal => Local::now().naive_local(),
            Clock::Zone(tz) => Utc::now().with_timezone(tz).naive_local(),
            Clock::Fixed(moment) => *moment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_toml_with_overrides() {
        let config = PipelineConfig::from_toml_str(
            r#"
            source_url = "https://example.com/export.csv"
            timezone = "Asia/Kolkata"
            date_formats = ["%Y%m%d"]

            [[departments]]
            department = "IT & Admin"
            keywords = ["server"]

            [[departments]]
            department = "HR & Payroll"
            keywords = ["payroll", "server room induction"]

            [columns]
            description = ["Job"]
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
        assert_eq!(config.clock().expect("zone"), Clock::Zone(chrono_tz::Asia::Kolkata));

        let classifier = config.classifier();
        assert_eq!(
            classifier.classify("Server room induction"),
            Department::ItAdmin
        );
        assert_eq!(classifier.classify("Run payroll"), Department::HrPayroll);
        assert_eq!(classifier.classify("Tender"), Department::General);

        let synonyms = config.columns.clone().expect("columns");
        assert_eq!(synonyms.description, vec!["Job".to_string()]);
        assert_eq!(synonyms.status, ColumnSynonyms::default().status);

        assert_eq!(
            config.date_parser().parse("20240115"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = PipelineConfig::default();
        config.apply_env(|key| match key {
            ENV_SOURCE_URL => Some(" https://example.com/other.csv ".to_string()),
            ENV_TIMEZONE => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.source_url, "https://example.com/other.csv");
        assert_eq!(config.timezone, None);
    }

    #[test]
    fn rejects_bad_urls_and_zones() {
        let mut config = PipelineConfig {
            source_url: "ftp://example.com/export.csv".to_string(),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SourceUrl { .. })
        ));

        config.source_url = DEFAULT_SOURCE_URL.to_string();
        config.timezone = Some("Mars/Olympus".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Timezone(_))));
    }

    #[test]
    fn loads_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        std::io::Write::write_all(&mut file, b"timeout_secs = 5\ntimezone = \"UTC\"\n")
            .expect("write config");

        let config = PipelineConfig::load(file.path()).expect("load config");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);

        let missing = PipelineConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn unknown_department_names_fail_to_load() {
        let result = PipelineConfig::from_toml_str(
            r#"
            [[departments]]
            department = "Marketing"
            keywords = ["campaign"]
            "#,
        );
        assert!(result.is_err());
    }
}
