pub mod config;
pub mod departments;
pub mod error;
pub mod fetch;
pub mod ingestion;
pub mod pipelines;
pub mod session;
pub mod summary;
pub mod types;

pub use config::{Clock, PipelineConfig};
pub use departments::{Classifier, Department, DepartmentRule};
pub use error::{ConfigError, FetchError, PipelineError};
pub use fetch::{FileFetcher, HttpFetcher, SourceFetcher, StaticFetcher};
pub use ingestion::IngestReport;
pub use pipelines::{build_dashboard, run_pipeline, ExecutionContext};
pub use session::DashboardSession;
pub use types::{DashboardData, DepartmentStats, Task, TaskStatus};
