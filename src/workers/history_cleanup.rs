use std::sync::Arc;

use chrono::Local;
use tracing::info;

use crate::services::ProblemService;

/// One janitor sweep: purge day buckets past the retention horizon.
pub fn sweep(service: Arc<ProblemService>) -> usize {
    let removed = service.run_cleanup(Local::now().date_naive());
    if removed > 0 {
        info!(removed, "history cleanup removed stale entries");
    }
    removed
}
