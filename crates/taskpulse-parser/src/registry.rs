use chrono::NaiveDate;

use crate::formats::{ExplicitFormats, LenientInterpreter};

pub trait DateStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    /// Receives trimmed, non-empty text. `None` hands control to the next strategy.
    fn parse(&self, text: &str) -> Option<NaiveDate>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub date: NaiveDate,
    pub strategy: &'static str,
}

pub fn parse_with_strategies(text: &str, strategies: &[&dyn DateStrategy]) -> Option<DateMatch> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    strategies.iter().find_map(|strategy| {
        strategy.parse(trimmed).map(|date| DateMatch {
            date,
            strategy: strategy.name(),
        })
    })
}

/// Explicit pattern table first, lenient interpreter last.
#[derive(Debug, Clone, Default)]
pub struct DateParser {
    explicit: ExplicitFormats,
    lenient: LenientInterpreter,
}

impl DateParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats(explicit: ExplicitFormats) -> Self {
        Self {
            explicit,
            lenient: LenientInterpreter,
        }
    }

    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        self.parse_detailed(text).map(|m| m.date)
    }

    pub fn parse_detailed(&self, text: &str) -> Option<DateMatch> {
        let strategies: [&dyn DateStrategy; 2] = [&self.explicit, &self.lenient];
        parse_with_strategies(text, &strategies)
    }
}

pub fn parse_task_date(text: &str) -> Option<NaiveDate> {
    DateParser::new().parse(text)
}
