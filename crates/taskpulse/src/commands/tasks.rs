use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use taskpulse_core::DashboardSession;

use super::format_date;

pub async fn handle_tasks_command(
    session: &DashboardSession,
    department: &str,
    json: bool,
) -> Result<()> {
    session
        .refresh()
        .await
        .context("failed to refresh dashboard")?;
    let tasks = session.select_department(department);

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks for department '{department}'.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Description", "Status", "Date", "Parsed"]);

    for task in &tasks {
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(&task.description),
            Cell::new(task.status),
            Cell::new(&task.raw_date_text),
            Cell::new(format_date(task.parsed_date)),
        ]);
    }

    println!("{table}");
    println!("{} task(s) in {department}", tasks.len());
    Ok(())
}
