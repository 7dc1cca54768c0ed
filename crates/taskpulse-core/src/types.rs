// crates/taskpulse-core/src/types.rs

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use taskpulse_parser::RawRecord;

use crate::departments::Department;
use crate::ingestion::IngestReport;

/// The export's free-text status only distinguishes finished work from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaskStatus {
    Done,
    Pending,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Done => "Done",
            TaskStatus::Pending => "Pending",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    pub raw_date_text: String,
    pub parsed_date: Option<NaiveDate>,
    pub department: Department,
    pub raw_record: RawRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStats {
    pub name: Department,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub percentage: u8,
    pub next_deadline: Option<NaiveDate>,
    pub overdue_count: usize,
}

/// One ingestion cycle's immutable snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub tasks: Vec<Task>,
    pub department_stats: Vec<DepartmentStats>,
    pub overall_progress: u8,
    pub report: IngestReport,
    pub source_hash: String,
}

impl DashboardData {
    /// Narrows the task list to one department, matched by display name
    /// (case-insensitive). Unknown names select nothing.
    pub fn tasks_for_department(&self, name: &str) -> Vec<&Task> {
        match name.parse::<Department>() {
            Ok(department) => self
                .tasks
                .iter()
                .filter(|task| task.department == department)
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn stats_for(&self, department: Department) -> Option<&DepartmentStats> {
        self.department_stats
            .iter()
            .find(|stats| stats.name == department)
    }
}
