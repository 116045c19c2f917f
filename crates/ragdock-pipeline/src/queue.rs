//! Background ingest queue.
//!
//! Replaces fire-and-forget indexing with an explicit job queue: uploads are
//! enqueued, a worker task drains them, and callers can poll a job's status
//! or await its completion. Failed jobs are retried a bounded number of
//! times, then parked on the dead-letter list.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use ragdock_core::{Workspace, WorkspaceFile};
use serde::Serialize;
use tokio::sync::{mpsc, Notify};
use tracing::{error, info, warn};

use crate::ingest::DocumentPipeline;

/// Attempts per job before it is declared dead.
pub const MAX_ATTEMPTS: u32 = 3;
/// Heuristic pause after a successful index call, giving the search
/// service's near-real-time indexing a moment to settle before reads.
pub const INDEX_SETTLE_DELAY: Duration = Duration::from_secs(1);
/// Finished jobs kept around for status queries.
const MAX_FINISHED_JOBS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Queued,
    Processing,
    Completed,
    /// Exhausted its retries; parked on the dead-letter list.
    Dead,
}

/// One enqueued file-indexing job.
#[derive(Debug, Clone, Serialize)]
pub struct IngestJob {
    pub id: String,
    pub workspace: Workspace,
    pub file: WorkspaceFile,
    pub status: IngestStatus,
    pub attempts: u32,
    pub error: Option<String>,
    pub queued_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl IngestJob {
    pub fn is_finished(&self) -> bool {
        matches!(self.status, IngestStatus::Completed | IngestStatus::Dead)
    }
}

struct QueueInner {
    jobs: RwLock<HashMap<String, IngestJob>>,
    tx: mpsc::UnboundedSender<String>,
    done: Notify,
    settle: Duration,
}

/// Handle to the ingest queue and its worker task.
#[derive(Clone)]
pub struct IngestQueue {
    inner: Arc<QueueInner>,
}

impl IngestQueue {
    /// Spawn the worker and return the queue handle.
    pub fn start(pipeline: Arc<DocumentPipeline>) -> Self {
        Self::start_with_settle(pipeline, INDEX_SETTLE_DELAY)
    }

    /// As [`start`](Self::start), with an explicit settle delay (tests pass
    /// zero).
    pub fn start_with_settle(pipeline: Arc<DocumentPipeline>, settle: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let inner = Arc::new(QueueInner {
            jobs: RwLock::new(HashMap::new()),
            tx,
            done: Notify::new(),
            settle,
        });

        let worker = inner.clone();
        tokio::spawn(async move {
            info!("Ingest worker started");
            while let Some(job_id) = rx.recv().await {
                process_job(&worker, &pipeline, &job_id).await;
            }
        });

        Self { inner }
    }

    /// Queue a file for indexing. Returns the job id.
    pub fn enqueue(&self, workspace: Workspace, file: WorkspaceFile) -> String {
        let job_id = uuid::Uuid::new_v4().to_string();
        let job = IngestJob {
            id: job_id.clone(),
            workspace,
            file,
            status: IngestStatus::Queued,
            attempts: 0,
            error: None,
            queued_at: Utc::now(),
            started_at: None,
            completed_at: None,
        };

        info!("Queued indexing job {} for {}", job_id, job.file.original_name);
        self.inner.jobs.write().insert(job_id.clone(), job);
        if self.inner.tx.send(job_id.clone()).is_err() {
            error!("Ingest worker is gone; job {} will not run", job_id);
        }
        job_id
    }

    /// Current snapshot of a job, if it is still known.
    pub fn job(&self, job_id: &str) -> Option<IngestJob> {
        self.inner.jobs.read().get(job_id).cloned()
    }

    /// Await a job's completion (successful or dead). Returns `None` for an
    /// unknown job id.
    pub async fn wait(&self, job_id: &str) -> Option<IngestJob> {
        loop {
            let notified = self.inner.done.notified();
            tokio::pin!(notified);
            // Register before checking, so a completion landing in between
            // still wakes this waiter.
            notified.as_mut().enable();
            match self.job(job_id) {
                None => return None,
                Some(job) if job.is_finished() => return Some(job),
                Some(_) => {}
            }
            notified.await;
        }
    }

    /// Jobs that exhausted their retries.
    pub fn dead_letter(&self) -> Vec<IngestJob> {
        self.inner
            .jobs
            .read()
            .values()
            .filter(|job| job.status == IngestStatus::Dead)
            .cloned()
            .collect()
    }
}

async fn process_job(inner: &Arc<QueueInner>, pipeline: &DocumentPipeline, job_id: &str) {
    let (workspace, file, attempt) = {
        let mut jobs = inner.jobs.write();
        let Some(job) = jobs.get_mut(job_id) else {
            warn!("Dropped unknown job {}", job_id);
            return;
        };
        job.status = IngestStatus::Processing;
        job.attempts += 1;
        job.started_at = Some(Utc::now());
        (job.workspace.clone(), job.file.clone(), job.attempts)
    };

    info!(
        "Processing job {} (attempt {}/{}): {}",
        job_id, attempt, MAX_ATTEMPTS, file.original_name
    );

    if pipeline.index_file(&workspace, &file).await {
        // Let near-real-time indexing settle before a waiter reads back.
        if !inner.settle.is_zero() {
            tokio::time::sleep(inner.settle).await;
        }
        {
            let mut jobs = inner.jobs.write();
            if let Some(job) = jobs.get_mut(job_id) {
                job.status = IngestStatus::Completed;
                job.error = None;
                job.completed_at = Some(Utc::now());
            }
        }
        inner.done.notify_waiters();
        cleanup_finished(inner);
        return;
    }

    if attempt >= MAX_ATTEMPTS {
        error!(
            "Job {} failed after {} attempts; moving to dead letter",
            job_id, attempt
        );
        {
            let mut jobs = inner.jobs.write();
            if let Some(job) = jobs.get_mut(job_id) {
                job.status = IngestStatus::Dead;
                job.error = Some(format!("indexing failed after {attempt} attempts"));
                job.completed_at = Some(Utc::now());
            }
        }
        inner.done.notify_waiters();
        return;
    }

    warn!("Job {} attempt {} failed; requeueing", job_id, attempt);
    {
        let mut jobs = inner.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            job.status = IngestStatus::Queued;
        }
    }
    if inner.tx.send(job_id.to_string()).is_err() {
        error!("Ingest worker is gone; job {} stuck", job_id);
    }
}

/// Drop the oldest finished jobs once more than [`MAX_FINISHED_JOBS`] have
/// accumulated.
fn cleanup_finished(inner: &Arc<QueueInner>) {
    let mut jobs = inner.jobs.write();
    let mut finished: Vec<(String, DateTime<Utc>)> = jobs
        .values()
        .filter(|job| job.is_finished())
        .filter_map(|job| job.completed_at.map(|at| (job.id.clone(), at)))
        .collect();

    if finished.len() <= MAX_FINISHED_JOBS {
        return;
    }
    finished.sort_by_key(|(_, at)| *at);
    let excess = finished.len() - MAX_FINISHED_JOBS;
    for (id, _) in finished.into_iter().take(excess) {
        jobs.remove(&id);
    }
}
