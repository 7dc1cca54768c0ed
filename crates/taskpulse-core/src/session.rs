use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::error::Result;
use crate::fetch::SourceFetcher;
use crate::pipelines::{run_pipeline, ExecutionContext};
use crate::types::{DashboardData, Task};

/// Owns the latest dashboard snapshot for one caller.
///
/// Refreshes are serialized: a second trigger waits for the in-flight run instead of
/// racing it, so snapshots are published in trigger order. A failed refresh leaves
/// the previous snapshot in place.
pub struct DashboardSession {
    fetcher: Arc<dyn SourceFetcher>,
    ctx: ExecutionContext,
    refresh_lock: Mutex<()>,
    current: watch::Sender<Option<Arc<DashboardData>>>,
}

impl DashboardSession {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, ctx: ExecutionContext) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            fetcher,
            ctx,
            refresh_lock: Mutex::new(()),
            current,
        }
    }

    pub async fn refresh(&self) -> Result<Arc<DashboardData>> {
        let _guard = self.refresh_lock.lock().await;
        match run_pipeline(self.fetcher.as_ref(), &self.ctx).await {
            Ok(dashboard) => {
                let snapshot = Arc::new(dashboard);
                self.current.send_replace(Some(Arc::clone(&snapshot)));
                info!(source_hash = %snapshot.source_hash, "published dashboard snapshot");
                Ok(snapshot)
            }
            Err(err) => {
                warn!(error = %err, "refresh failed; keeping previous snapshot");
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> Option<Arc<DashboardData>> {
        self.current.borrow().clone()
    }

    /// Receiver that observes every published snapshot, for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DashboardData>>> {
        self.current.subscribe()
    }

    /// Department-selection callback: tasks of `department` in the current snapshot.
    pub fn select_department(&self, department: &str) -> Vec<Task> {
        self.snapshot()
            .map(|data| {
                data.tasks_for_department(department)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
