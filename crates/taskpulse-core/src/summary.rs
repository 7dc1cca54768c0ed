use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::departments::Department;
use crate::types::{DepartmentStats, Task};

/// `round(completed / total * 100)` with halves rounded up; 0 for an empty group.
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((completed * 200 + total) / (total * 2)) as u8
}

pub fn overall_progress(tasks: &[Task]) -> u8 {
    let completed = tasks.iter().filter(|t| t.status.is_done()).count();
    completion_percentage(completed, tasks.len())
}

/// Stats for every department that owns at least one task: declared departments in
/// table order, then the catch-all.
///
/// `now` is the local wall-clock moment. A pending task is overdue once its date is
/// before today, and only counts as upcoming once its date starts after `now`, so a
/// task due today is neither.
pub fn department_stats(tasks: &[Task], now: NaiveDateTime) -> Vec<DepartmentStats> {
    Department::all()
        .map(|department| stats_for(department, tasks, now))
        .filter(|stats| stats.total_tasks > 0)
        .collect()
}

fn stats_for(department: Department, tasks: &[Task], now: NaiveDateTime) -> DepartmentStats {
    let today = now.date();
    let mut total_tasks = 0;
    let mut completed_tasks = 0;
    let mut overdue_count = 0;
    let mut next_deadline: Option<NaiveDate> = None;

    for task in tasks.iter().filter(|t| t.department == department) {
        total_tasks += 1;
        if task.status.is_done() {
            completed_tasks += 1;
            continue;
        }
        let Some(date) = task.parsed_date else {
            continue;
        };
        if date < today {
            overdue_count += 1;
        }
        if date.and_time(NaiveTime::MIN) > now {
            next_deadline = Some(next_deadline.map_or(date, |current| current.min(date)));
        }
    }

    DepartmentStats {
        name: department,
        total_tasks,
        completed_tasks,
        percentage: completion_percentage(completed_tasks, total_tasks),
        next_deadline,
        overdue_count,
    }
}
