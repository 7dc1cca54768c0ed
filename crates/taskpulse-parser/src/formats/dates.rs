use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::registry::DateStrategy;

/// Calendar patterns tried in order. Two-digit-year patterns come before their
/// four-digit twins: `%y` rejects a four-digit year as trailing input, while `%Y`
/// would happily read "24" as the year 24.
pub static DEFAULT_DATE_FORMATS: &[&str] = &[
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d/%m/%y",
    "%m/%d/%y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%d %b %y",
    "%d %b %Y",
    "%b %d, %Y",
];

static LENIENT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static LENIENT_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B, %Y",
    "%a %b %d %Y",
    "%A, %B %d, %Y",
    "%A %B %d %Y",
];

/// The fixed, ordered pattern table.
#[derive(Debug, Clone)]
pub struct ExplicitFormats {
    formats: Vec<String>,
}

impl ExplicitFormats {
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }
}

impl Default for ExplicitFormats {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().copied())
    }
}

impl DateStrategy for ExplicitFormats {
    fn name(&self) -> &'static str {
        "explicit_formats"
    }

    fn parse(&self, text: &str) -> Option<NaiveDate> {
        self.formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    }
}

/// Catch-all interpreter for machine-generated and long-hand date text that the
/// spreadsheet occasionally carries (ISO timestamps, RFC 2822 mail dates, "Mon Jan 15 2024").
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientInterpreter;

impl DateStrategy for LenientInterpreter {
    fn name(&self) -> &'static str {
        "lenient"
    }

    fn parse(&self, text: &str) -> Option<NaiveDate> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
            return Some(dt.date_naive());
        }
        for fmt in LENIENT_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
                return Some(dt.date());
            }
        }
        LENIENT_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    }
}
