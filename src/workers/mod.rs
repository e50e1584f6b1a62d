mod history_cleanup;

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

use crate::services::ProblemService;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}

pub struct WorkerManager {
    scheduler: Mutex<JobScheduler>,
    shutdown_tx: broadcast::Sender<()>,
    problem_service: Arc<ProblemService>,
    cleanup_schedule: String,
}

impl WorkerManager {
    pub async fn new(
        problem_service: Arc<ProblemService>,
        cleanup_schedule: String,
    ) -> Result<Self, WorkerError> {
        let scheduler = JobScheduler::new().await.map_err(WorkerError::Scheduler)?;
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            shutdown_tx,
            problem_service,
            cleanup_schedule,
        })
    }

    pub async fn start(&self) -> Result<(), WorkerError> {
        let enable_cleanup = std::env::var("ENABLE_HISTORY_CLEANUP_WORKER")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        if !enable_cleanup {
            info!("history cleanup worker disabled, skipping worker startup");
            return Ok(());
        }

        let scheduler = self.scheduler.lock().await;

        let service = Arc::clone(&self.problem_service);
        let shutdown_rx = self.shutdown_tx.subscribe();
        let job = Job::new_async(self.cleanup_schedule.as_str(), move |_uuid, _lock| {
            let service = Arc::clone(&service);
            let mut rx = shutdown_rx.resubscribe();
            Box::pin(async move {
                tokio::select! {
                    _ = rx.recv() => {},
                    _ = async {
                        history_cleanup::sweep(service);
                    } => {}
                }
            })
        })
        .map_err(WorkerError::Scheduler)?;
        scheduler.add(job).await.map_err(WorkerError::Scheduler)?;
        info!(schedule = %self.cleanup_schedule, "history cleanup worker scheduled");

        scheduler.start().await.map_err(WorkerError::Scheduler)?;
        info!("workers started");

        Ok(())
    }

    pub async fn stop(&self) {
        info!("stopping workers...");
        let _ = self.shutdown_tx.send(());

        let mut scheduler = self.scheduler.lock().await;
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "error shutting down scheduler");
        }

        info!("workers stopped");
    }
}
