// crates/taskpulse/src/main.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use taskpulse_core::config::ENV_CONFIG_PATH;
use taskpulse_core::{
    DashboardSession, ExecutionContext, FileFetcher, HttpFetcher, PipelineConfig, SourceFetcher,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::columns::handle_columns_command;
use commands::summary::handle_summary_command;
use commands::tasks::handle_tasks_command;

/// Departmental progress dashboard over a published task tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Published CSV export to read instead of the configured one
    #[arg(long, global = true)]
    url: Option<String>,

    /// Read a local CSV export instead of fetching over HTTP
    #[arg(long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// TOML configuration file (falls back to TASKPULSE_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// IANA timezone used to decide what "today" is
    #[arg(long, global = true)]
    timezone: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-department completion, deadlines and overall progress
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Tasks belonging to one department
    Tasks {
        #[arg(short, long)]
        department: String,
        #[arg(long)]
        json: bool,
    },
    /// Show which headers were picked for description, status and date
    Columns,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.source)?;
    let ctx = ExecutionContext::from_config(&config).context("invalid configuration")?;
    let fetcher = build_fetcher(&cli.source, &config)?;

    match cli.command {
        Command::Summary { json } => {
            let session = DashboardSession::new(fetcher, ctx);
            handle_summary_command(&session, json).await?;
        }
        Command::Tasks { department, json } => {
            let session = DashboardSession::new(fetcher, ctx);
            handle_tasks_command(&session, &department, json).await?;
        }
        Command::Columns => {
            handle_columns_command(fetcher.as_ref(), &ctx).await?;
        }
    }

    Ok(())
}

/// File, then `TASKPULSE_*` environment, then command-line flags.
fn load_config(args: &SourceArgs) -> Result<PipelineConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            PipelineConfig::load(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    config.apply_env(|key| std::env::var(key).ok());

    if let Some(url) = &args.url {
        config.source_url = url.clone();
    }
    if let Some(tz) = &args.timezone {
        config.timezone = Some(tz.clone());
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn build_fetcher(args: &SourceArgs, config: &PipelineConfig) -> Result<Arc<dyn SourceFetcher>> {
    if let Some(path) = &args.input {
        return Ok(Arc::new(FileFetcher::new(path.clone())));
    }
    let fetcher = HttpFetcher::new(config.source_url.clone(), config.timeout())
        .context("failed to build HTTP client")?;
    Ok(Arc::new(fetcher))
}
