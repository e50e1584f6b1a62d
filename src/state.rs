use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::config::Config;
use crate::history::ProblemHistory;
use crate::problems::ProblemCatalog;
use crate::services::ProblemService;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    config: Config,
    history: Arc<ProblemHistory>,
    problem_service: Arc<ProblemService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let catalog = Arc::new(ProblemCatalog::with_builtin_types());
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: Config, catalog: Arc<ProblemCatalog>) -> Self {
        let history = Arc::new(ProblemHistory::new());
        let problem_service = Arc::new(ProblemService::new(
            catalog,
            Arc::clone(&history),
            config.problem_max_attempts,
            config.history_max_age_days,
        ));

        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            config,
            history,
            problem_service,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> Arc<ProblemHistory> {
        Arc::clone(&self.history)
    }

    pub fn problem_service(&self) -> Arc<ProblemService> {
        Arc::clone(&self.problem_service)
    }
}
