use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_MAX_AGE_DAYS: i64 = 21;
const DEFAULT_MAX_ATTEMPTS: u32 = 200;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_CLEANUP_SCHEDULE: &str = "0 0 3 * * *";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Day buckets strictly older than this many days are purged.
    pub history_max_age_days: i64,
    /// Generation attempts per request before giving up.
    pub problem_max_attempts: u32,
    /// Deadline applied to each problem request.
    pub request_timeout: Duration,
    /// Cron expression for the history cleanup worker.
    pub cleanup_schedule: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let history_max_age_days = env_u64("HISTORY_MAX_AGE_DAYS")
            .map(|v| v as i64)
            .unwrap_or(DEFAULT_MAX_AGE_DAYS);

        let problem_max_attempts = env_u64("PROBLEM_MAX_ATTEMPTS")
            .map(|v| v as u32)
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);

        let request_timeout = Duration::from_millis(
            env_u64("REQUEST_TIMEOUT_MS").unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        );

        let cleanup_schedule = std::env::var("HISTORY_CLEANUP_SCHEDULE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLEANUP_SCHEDULE.to_string());

        Self {
            host,
            port,
            log_level,
            history_max_age_days,
            problem_max_attempts,
            request_timeout,
            cleanup_schedule,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let value = std::env::var(key).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u64>().ok()
}
