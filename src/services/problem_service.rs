use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::history::{DayKey, ProblemHistory};
use crate::problems::{CandidateKey, FormattedProblem, ProblemCatalog};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("unknown problem type: {0}")]
    UnknownProblemType(String),
    #[error("no fresh problem available after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("request deadline elapsed before a fresh problem was found")]
    TimedOut,
}

/// Orchestrates one problem request: generate a candidate, ask the history
/// engine for admission, trim and retry on collision, give up after a bound.
pub struct ProblemService {
    catalog: Arc<ProblemCatalog>,
    history: Arc<ProblemHistory>,
    max_attempts: u32,
    max_age_days: i64,
}

impl ProblemService {
    pub fn new(
        catalog: Arc<ProblemCatalog>,
        history: Arc<ProblemHistory>,
        max_attempts: u32,
        max_age_days: i64,
    ) -> Self {
        Self {
            catalog,
            history,
            max_attempts,
            max_age_days,
        }
    }

    pub fn request_problem(
        &self,
        type_id: &str,
        deadline: Option<Instant>,
    ) -> Result<FormattedProblem, RequestError> {
        let today = DayKey::from_datetime(Local::now()).date();
        self.request_problem_on(type_id, today, deadline)
    }

    /// Same as `request_problem` with the calendar date injected, so tests can
    /// pin history buckets to exact days.
    pub fn request_problem_on(
        &self,
        type_id: &str,
        today: NaiveDate,
        deadline: Option<Instant>,
    ) -> Result<FormattedProblem, RequestError> {
        let definition = self
            .catalog
            .get(type_id)
            .ok_or_else(|| RequestError::UnknownProblemType(type_id.to_string()))?;

        let limit = definition.turnover_limit();
        let mut rng = rand::rng();

        for attempt in 1..=self.max_attempts {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    warn!(type_id, attempt, "problem request timed out");
                    return Err(RequestError::TimedOut);
                }
            }

            let generated = definition.generate(&mut rng);
            let key = CandidateKey::from_value(&generated.key);

            if self.history.try_admit(type_id, &key, today) {
                let evicted = self.history.enforce_turnover(type_id, limit);
                debug!(type_id, attempt, evicted, "admitted fresh problem");
                return Ok(definition.format(&generated));
            }

            // A collision hints the history is saturated; reclaim the oldest
            // entries before the next attempt.
            self.history.enforce_turnover(type_id, limit);
        }

        warn!(
            type_id,
            attempts = self.max_attempts,
            "exhausted attempt budget without a fresh problem"
        );
        Err(RequestError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Janitor entry point shared by the cron worker and the admin route.
    pub fn run_cleanup(&self, today: NaiveDate) -> usize {
        self.history.cleanup(today, self.max_age_days)
    }

    pub fn history(&self) -> Arc<ProblemHistory> {
        Arc::clone(&self.history)
    }

    pub fn catalog(&self) -> Arc<ProblemCatalog> {
        Arc::clone(&self.catalog)
    }
}
