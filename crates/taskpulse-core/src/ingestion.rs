use serde::Serialize;
use taskpulse_parser::{
    ColumnRole, DateParser, RawRecord, ResolvedColumns, TabularData, DATE_COLUMN_POSITION,
};
use tracing::{info, warn};

use crate::departments::{Classifier, Department};
use crate::types::{Task, TaskStatus};

pub const UNTITLED_TASK: &str = "Untitled Task";
pub const DEFAULT_STATUS_TEXT: &str = "Pending";

const DONE_MARKERS: [&str; 2] = ["done", "completed"];

/// Row-level degradations seen while normalizing. None of these abort a run;
/// they are counted so a caller can tell a clean export from a patched-up one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub total_rows: usize,
    pub degraded_rows: usize,
    pub untitled: usize,
    pub status_defaulted: usize,
    pub date_missing: usize,
    pub date_unparsed: usize,
    pub date_from_position: usize,
    pub uncategorized: usize,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.degraded_rows == 0
    }
}

#[derive(Debug, Default)]
struct RowIssues {
    untitled: bool,
    status_defaulted: bool,
    date_missing: bool,
    date_unparsed: bool,
    date_from_position: bool,
}

impl RowIssues {
    fn degraded(&self) -> bool {
        self.untitled || self.status_defaulted || self.date_missing || self.date_unparsed
    }
}

#[derive(Debug)]
pub struct IngestionBatch {
    pub tasks: Vec<Task>,
    pub columns: ResolvedColumns,
    pub report: IngestReport,
}

pub fn classify_status(text: &str) -> TaskStatus {
    let lower = text.to_lowercase();
    if DONE_MARKERS.iter().any(|marker| lower.contains(marker)) {
        TaskStatus::Done
    } else {
        TaskStatus::Pending
    }
}

/// Maps raw rows onto canonical tasks using columns resolved once for the whole table.
pub struct Normalizer<'a> {
    columns: &'a ResolvedColumns,
    dates: &'a DateParser,
    classifier: &'a Classifier,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        columns: &'a ResolvedColumns,
        dates: &'a DateParser,
        classifier: &'a Classifier,
    ) -> Self {
        Self {
            columns,
            dates,
            classifier,
        }
    }

    pub fn normalize(&self, position: usize, record: &RawRecord) -> Task {
        self.normalize_with_issues(position, record).0
    }

    fn normalize_with_issues(&self, position: usize, record: &RawRecord) -> (Task, RowIssues) {
        let mut issues = RowIssues::default();

        let description_text = self.cell(record, ColumnRole::Description);
        let description = if description_text.trim().is_empty() {
            issues.untitled = true;
            UNTITLED_TASK.to_string()
        } else {
            description_text.to_string()
        };

        let status_text = match self.cell(record, ColumnRole::Status).trim() {
            "" => {
                issues.status_defaulted = true;
                DEFAULT_STATUS_TEXT
            }
            text => text,
        };
        let status = classify_status(status_text);

        let mut raw_date_text = self.cell(record, ColumnRole::Date);
        if raw_date_text.trim().is_empty() && record.len() > DATE_COLUMN_POSITION + 1 {
            if let Some(value) = record.value_at(DATE_COLUMN_POSITION) {
                issues.date_from_position = !value.trim().is_empty();
                raw_date_text = value;
            }
        }

        let parsed_date = self.dates.parse(raw_date_text);
        if raw_date_text.trim().is_empty() {
            issues.date_missing = true;
        } else if parsed_date.is_none() {
            issues.date_unparsed = true;
        }

        let department = self.classifier.classify(&description);

        let task = Task {
            id: format!("task-{}", position + 1),
            description,
            status,
            raw_date_text: raw_date_text.to_string(),
            parsed_date,
            department,
            raw_record: record.clone(),
        };
        (task, issues)
    }

    fn cell<'r>(&self, record: &'r RawRecord, role: ColumnRole) -> &'r str {
        self.columns
            .index(role)
            .and_then(|index| record.value_at(index))
            .unwrap_or_default()
    }
}

pub fn ingest_table(
    table: &TabularData,
    columns: ResolvedColumns,
    dates: &DateParser,
    classifier: &Classifier,
) -> IngestionBatch {
    let normalizer = Normalizer::new(&columns, dates, classifier);
    let mut report = IngestReport {
        total_rows: table.row_count(),
        ..IngestReport::default()
    };

    let mut tasks = Vec::with_capacity(table.row_count());
    for (position, record) in table.records.iter().enumerate() {
        let (task, issues) = normalizer.normalize_with_issues(position, record);

        report.untitled += usize::from(issues.untitled);
        report.status_defaulted += usize::from(issues.status_defaulted);
        report.date_missing += usize::from(issues.date_missing);
        report.date_unparsed += usize::from(issues.date_unparsed);
        report.date_from_position += usize::from(issues.date_from_position);
        report.degraded_rows += usize::from(issues.degraded());
        if task.department == Department::CATCH_ALL {
            report.uncategorized += 1;
        }

        tasks.push(task);
    }

    if report.is_clean() {
        info!(rows = report.total_rows, "normalized all rows cleanly");
    } else {
        warn!(
            rows = report.total_rows,
            degraded = report.degraded_rows,
            untitled = report.untitled,
            status_defaulted = report.status_defaulted,
            date_missing = report.date_missing,
            date_unparsed = report.date_unparsed,
            "normalized rows with fallbacks"
        );
    }

    IngestionBatch {
        tasks,
        columns,
        report,
    }
}
