use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use taskpulse_core::{
    Clock, DashboardSession, ExecutionContext, FetchError, PipelineError, SourceFetcher,
    TaskStatus,
};

fn fixed_context() -> ExecutionContext {
    let now = NaiveDate::from_ymd_opt(2024, 3, 10)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid moment");
    ExecutionContext::default().with_clock(Clock::Fixed(now))
}

/// Serves a scripted sequence of bodies and flags overlapping fetches.
struct ScriptedFetcher {
    calls: AtomicUsize,
    in_flight: AtomicBool,
    overlapped: AtomicBool,
    bodies: Vec<Option<&'static str>>,
}

impl ScriptedFetcher {
    fn new(bodies: Vec<Option<&'static str>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            in_flight: AtomicBool::new(false),
            overlapped: AtomicBool::new(false),
            bodies,
        }
    }
}

#[async_trait]
impl SourceFetcher for ScriptedFetcher {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.store(false, Ordering::SeqCst);

        let body = self.bodies[call % self.bodies.len()];
        body.map(|text| text.as_bytes().to_vec())
            .ok_or_else(|| FetchError::Status {
                url: "scripted".to_string(),
                status: 503,
            })
    }
}

#[tokio::test]
async fn refresh_publishes_snapshot() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Some(
        "Task,Status,EDD\nPayroll run,Done,15-Jan-24\n",
    )]));
    let session = DashboardSession::new(fetcher, fixed_context());
    assert!(session.snapshot().is_none());

    let published = session.refresh().await.expect("refresh");
    let current = session.snapshot().expect("snapshot");
    assert!(Arc::ptr_eq(&published, &current));
    assert_eq!(current.overall_progress, 100);

    let selected = session.select_department("HR & Payroll");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].status, TaskStatus::Done);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        Some("Task,Status\nInvoice batch,Pending\n"),
        None,
    ]));
    let session = DashboardSession::new(fetcher, fixed_context());

    let first = session.refresh().await.expect("first refresh");
    let err = session.refresh().await.expect_err("second refresh fails");
    assert!(matches!(
        err,
        PipelineError::Fetch(FetchError::Status { status: 503, .. })
    ));

    let current = session.snapshot().expect("snapshot survives");
    assert!(Arc::ptr_eq(&first, &current));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_refreshes_are_serialized() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Some(
        "Task,Status\nServer patching,Done\n",
    )]));
    let session = Arc::new(DashboardSession::new(fetcher.clone(), fixed_context()));
    let mut updates = session.subscribe();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.refresh().await.map(|_| ()) })
        })
        .collect();

    for handle in handles {
        handle.await.expect("join").expect("refresh");
    }

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
    assert!(!fetcher.overlapped.load(Ordering::SeqCst));

    updates.changed().await.expect("snapshot published");
    assert!(updates.borrow().is_some());
}
