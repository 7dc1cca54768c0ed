use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use taskpulse_core::pipelines::inspect_columns;
use taskpulse_core::{ExecutionContext, SourceFetcher};
use taskpulse_parser::{ColumnMatch, ColumnRole, MatchSource, DATE_COLUMN_POSITION};

fn describe(column: Option<&ColumnMatch>) -> (String, String, String) {
    match column {
        None => ("-".to_string(), "-".to_string(), "not present".to_string()),
        Some(column) => {
            let source = match &column.source {
                MatchSource::Positional => format!("position {}", DATE_COLUMN_POSITION + 1),
                MatchSource::Synonym { candidate } => format!("synonym '{candidate}'"),
                MatchSource::Default => "default".to_string(),
            };
            let slot = column
                .index
                .map(|index| (index + 1).to_string())
                .unwrap_or_else(|| "missing".to_string());
            (column.header.clone(), slot, source)
        }
    }
}

pub async fn handle_columns_command(
    fetcher: &dyn SourceFetcher,
    ctx: &ExecutionContext,
) -> Result<()> {
    let body = fetcher
        .fetch()
        .await
        .with_context(|| format!("failed to fetch {}", fetcher.describe()))?;
    let (headers, resolved) =
        inspect_columns(&body, &ctx.resolver).context("failed to parse source")?;

    println!("{} header(s): {}", headers.len(), headers.join(" | "));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Role", "Header", "Column", "Matched by"]);

    let roles = [
        (ColumnRole::Description, resolved.description.as_ref()),
        (ColumnRole::Status, Some(&resolved.status)),
        (ColumnRole::Date, resolved.date.as_ref()),
    ];
    for (role, column) in roles {
        let (header, slot, source) = describe(column);
        table.add_row(vec![
            Cell::new(role),
            Cell::new(header),
            Cell::new(slot),
            Cell::new(source),
        ]);
    }

    println!("{table}");
    Ok(())
}
