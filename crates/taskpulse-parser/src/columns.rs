use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Zero-based slot where the export conventionally keeps its EDD column.
pub const DATE_COLUMN_POSITION: usize = 23;

pub const DEFAULT_STATUS_HEADER: &str = "Status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Description,
    Status,
    Date,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Description => "description",
            ColumnRole::Status => "status",
            ColumnRole::Date => "date",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchSource {
    /// Fixed-slot header carrying an EDD-like name.
    Positional,
    Synonym { candidate: String },
    /// Nothing matched; the role fell back to its default header.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMatch {
    pub header: String,
    /// Slot the role reads from. Duplicate header names make the name alone ambiguous.
    /// `None` when the default header is not in the table at all.
    pub index: Option<usize>,
    pub source: MatchSource,
}

impl ColumnMatch {
    fn new(header: impl Into<String>, index: Option<usize>, source: MatchSource) -> Self {
        Self {
            header: header.into(),
            index,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumns {
    pub description: Option<ColumnMatch>,
    pub status: ColumnMatch,
    pub date: Option<ColumnMatch>,
}

impl ResolvedColumns {
    pub fn column(&self, role: ColumnRole) -> Option<&ColumnMatch> {
        match role {
            ColumnRole::Description => self.description.as_ref(),
            ColumnRole::Status => Some(&self.status),
            ColumnRole::Date => self.date.as_ref(),
        }
    }

    pub fn header(&self, role: ColumnRole) -> Option<&str> {
        self.column(role).map(|m| m.header.as_str())
    }

    pub fn index(&self, role: ColumnRole) -> Option<usize> {
        self.column(role).and_then(|m| m.index)
    }
}

/// Known header names per role, most specific first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnSynonyms {
    pub description: Vec<String>,
    pub status: Vec<String>,
    pub date: Vec<String>,
}

impl ColumnSynonyms {
    pub fn for_role(&self, role: ColumnRole) -> &[String] {
        match role {
            ColumnRole::Description => &self.description,
            ColumnRole::Status => &self.status,
            ColumnRole::Date => &self.date,
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

static DEFAULT_SYNONYMS: Lazy<ColumnSynonyms> = Lazy::new(|| ColumnSynonyms {
    description: owned(&[
        "Task Description",
        "Description",
        "Task",
        "Activity",
        "Item",
        "Work",
    ]),
    status: owned(&["Status", "Task Status", "Current Status", "State", "Progress"]),
    date: owned(&["EDD at Site", "EDD", "Target Date", "Deadline", "Date"]),
});

impl Default for ColumnSynonyms {
    fn default() -> Self {
        DEFAULT_SYNONYMS.clone()
    }
}

/// Lowercases and drops everything that is not an ASCII letter or digit,
/// so "EDD @ Site " and "edd_at_site" compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    synonyms: ColumnSynonyms,
}

impl ColumnResolver {
    pub fn new(synonyms: ColumnSynonyms) -> Self {
        Self { synonyms }
    }

    pub fn resolve(&self, headers: &[String]) -> ResolvedColumns {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

        let description = self
            .find_synonym(ColumnRole::Description, headers, &normalized)
            .or_else(|| {
                headers
                    .first()
                    .map(|h| ColumnMatch::new(h.as_str(), Some(0), MatchSource::Default))
            });

        let status = self
            .find_synonym(ColumnRole::Status, headers, &normalized)
            .unwrap_or_else(|| {
                let index = headers.iter().position(|h| h == DEFAULT_STATUS_HEADER);
                ColumnMatch::new(DEFAULT_STATUS_HEADER, index, MatchSource::Default)
            });

        let date = self.resolve_date(headers, &normalized);

        let resolved = ResolvedColumns {
            description,
            status,
            date,
        };
        debug!(
            description = resolved.header(ColumnRole::Description),
            status = resolved.header(ColumnRole::Status),
            date = resolved.header(ColumnRole::Date),
            "resolved columns"
        );
        resolved
    }

    fn resolve_date(&self, headers: &[String], normalized: &[String]) -> Option<ColumnMatch> {
        let positional = headers.get(DATE_COLUMN_POSITION);

        if let Some(header) = positional {
            if normalized[DATE_COLUMN_POSITION].contains("edd") {
                return Some(ColumnMatch::new(
                    header.as_str(),
                    Some(DATE_COLUMN_POSITION),
                    MatchSource::Positional,
                ));
            }
        }

        self.find_synonym(ColumnRole::Date, headers, normalized)
            .or_else(|| {
                positional.map(|h| {
                    ColumnMatch::new(h.as_str(), Some(DATE_COLUMN_POSITION), MatchSource::Default)
                })
            })
    }

    fn find_synonym(
        &self,
        role: ColumnRole,
        headers: &[String],
        normalized: &[String],
    ) -> Option<ColumnMatch> {
        for candidate in self.synonyms.for_role(role) {
            let needle = normalize_header(candidate);
            if needle.is_empty() {
                continue;
            }
            let hit = normalized
                .iter()
                .position(|h| h == &needle || h.contains(needle.as_str()));
            if let Some(index) = hit {
                return Some(ColumnMatch::new(
                    headers[index].as_str(),
                    Some(index),
                    MatchSource::Synonym {
                        candidate: candidate.clone(),
                    },
                ));
            }
        }
        None
    }
}

pub fn resolve_columns(headers: &[String]) -> ResolvedColumns {
    ColumnResolver::default().resolve(headers)
}
