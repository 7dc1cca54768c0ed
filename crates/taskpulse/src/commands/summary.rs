// crates/taskpulse/src/commands/summary.rs

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use taskpulse_core::{DashboardSession, DepartmentStats, IngestReport};

use super::format_date;

#[derive(Serialize)]
struct SummaryView<'a> {
    overall_progress: u8,
    total_tasks: usize,
    departments: &'a [DepartmentStats],
    report: &'a IngestReport,
    source_hash: &'a str,
}

pub async fn handle_summary_command(session: &DashboardSession, json: bool) -> Result<()> {
    let data = session
        .refresh()
        .await
        .context("failed to refresh dashboard")?;

    if json {
        let view = SummaryView {
            overall_progress: data.overall_progress,
            total_tasks: data.tasks.len(),
            departments: &data.department_stats,
            report: &data.report,
            source_hash: &data.source_hash,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if data.department_stats.is_empty() {
        println!("No tasks found in the source.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Department",
            "Tasks",
            "Done",
            "Progress",
            "Next deadline",
            "Overdue",
        ]);

    for stats in &data.department_stats {
        table.add_row(vec![
            Cell::new(stats.name),
            Cell::new(stats.total_tasks).set_alignment(CellAlignment::Right),
            Cell::new(stats.completed_tasks).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}%", stats.percentage)).set_alignment(CellAlignment::Right),
            Cell::new(format_date(stats.next_deadline)),
            Cell::new(stats.overdue_count).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
    println!(
        "Overall progress: {}% across {} tasks",
        data.overall_progress,
        data.tasks.len()
    );

    let report = &data.report;
    if !report.is_clean() {
        println!(
            "{} of {} rows degraded ({} untitled, {} without status, {} unparsed dates, {} uncategorized)",
            report.degraded_rows,
            report.total_rows,
            report.untitled,
            report.status_defaulted,
            report.date_unparsed,
            report.uncategorized,
        );
    }

    Ok(())
}
