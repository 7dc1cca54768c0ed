use blake3::Hasher;
use chrono::NaiveDateTime;
use taskpulse_parser::{parse_tabular, ColumnResolver, DateParser, ParserError, ResolvedColumns};
use tracing::info;

use crate::config::{Clock, PipelineConfig};
use crate::departments::Classifier;
use crate::error::{ConfigError, Result};
use crate::fetch::SourceFetcher;
use crate::ingestion::ingest_table;
use crate::summary::{department_stats, overall_progress};
use crate::types::DashboardData;

/// Everything a run needs besides the source bytes. Tables are immutable for the
/// lifetime of the context.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub resolver: ColumnResolver,
    pub dates: DateParser,
    pub classifier: Classifier,
    pub clock: Clock,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            resolver: ColumnResolver::default(),
            dates: DateParser::default(),
            classifier: Classifier::default(),
            clock: Clock::SystemLocal,
        }
    }
}

impl ExecutionContext {
    pub fn from_config(config: &PipelineConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            resolver: config.column_resolver(),
            dates: config.date_parser(),
            classifier: config.classifier(),
            clock: config.clock()?,
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

/// Fetch, parse, resolve, normalize, aggregate. Only the fetch suspends.
pub async fn run_pipeline(
    fetcher: &dyn SourceFetcher,
    ctx: &ExecutionContext,
) -> Result<DashboardData> {
    info!(source = %fetcher.describe(), "starting ingestion");
    let body = fetcher.fetch().await?;
    let dashboard = build_dashboard(&body, ctx, ctx.clock.now())?;
    Ok(dashboard)
}

pub fn build_dashboard(
    body: &[u8],
    ctx: &ExecutionContext,
    now: NaiveDateTime,
) -> std::result::Result<DashboardData, ParserError> {
    let table = parse_tabular(body)?;
    let columns = ctx.resolver.resolve(&table.headers);
    let batch = ingest_table(&table, columns, &ctx.dates, &ctx.classifier);

    let department_stats = department_stats(&batch.tasks, now);
    let overall_progress = overall_progress(&batch.tasks);

    info!(
        tasks = batch.tasks.len(),
        departments = department_stats.len(),
        overall_progress,
        "built dashboard"
    );

    Ok(DashboardData {
        tasks: batch.tasks,
        department_stats,
        overall_progress,
        report: batch.report,
        source_hash: compute_hash(body),
    })
}

/// Column resolution alone, for diagnosing a renamed or reshuffled sheet.
pub fn inspect_columns(
    body: &[u8],
    resolver: &ColumnResolver,
) -> std::result::Result<(Vec<String>, ResolvedColumns), ParserError> {
    let table = parse_tabular(body)?;
    let resolved = resolver.resolve(&table.headers);
    Ok((table.headers.to_vec(), resolved))
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}
