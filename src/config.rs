use clap::Parser;
use std::num::NonZeroUsize;
use std::time::Duration;
use crate::error::ConfigError;

pub const DEFAULT_CAPACITY: usize = 500;
pub const DEFAULT_WINDOW_MS: u64 = 60_000;
// 20 past the first request in a minute
pub const DEFAULT_IP_LIMIT: u32 = 21;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "join-gateway")]
#[command(about = "Membership application service with per-identity submission throttling")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Submissions allowed per window for one ip + email key
    #[arg(long, default_value_t = 5)]
    pub submit_limit: u32,

    // Max distinct keys held by the submission limiter
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub limiter_capacity: usize,

    // Submission window in milliseconds
    #[arg(long, default_value_t = DEFAULT_WINDOW_MS)]
    pub limiter_window_ms: u64,

    // Requests allowed per window for one client IP on /api
    #[arg(long, default_value_t = DEFAULT_IP_LIMIT)]
    pub ip_limit: u32,

    #[arg(long, default_value_t = 10_000)]
    pub ip_limiter_capacity: usize,

    #[arg(long, default_value_t = DEFAULT_WINDOW_MS)]
    pub ip_window_ms: u64,

    // Header carrying the authenticated email, set by the upstream auth proxy
    #[arg(long, default_value = "x-auth-request-email")]
    pub identity_header: String,

    // reCAPTCHA secret; verification is skipped when absent
    #[arg(long, env = "RECAPTCHA_SECRET_KEY", hide_env_values = true)]
    pub recaptcha_secret: Option<String>,

    #[arg(long, default_value_t = 0.5)]
    pub recaptcha_min_score: f64,

    // Expiry sweep interval in seconds
    #[arg(long, default_value_t = 30)]
    pub sweep_interval: u64,

    #[arg(long, default_value_t = false)]
    pub registrations_closed: bool,
}

impl Args {
    pub fn settings(&self) -> Settings {
        Settings {
            submit_limit: self.submit_limit,
            submit_limiter: LimiterConfig {
                capacity: self.limiter_capacity,
                window: Duration::from_millis(self.limiter_window_ms),
            },
            ip_limit: self.ip_limit,
            ip_limiter: LimiterConfig {
                capacity: self.ip_limiter_capacity,
                window: Duration::from_millis(self.ip_window_ms),
            },
            registrations_open: !self.registrations_closed,
        }
    }
}

// one registry: max keys and counter lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterConfig {
    pub capacity: usize,
    pub window: Duration,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            window: Duration::from_millis(DEFAULT_WINDOW_MS),
        }
    }
}

impl LimiterConfig {
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self { capacity, window }
    }

    pub fn validate(&self) -> Result<NonZeroUsize, ConfigError> {
        let capacity = NonZeroUsize::new(self.capacity).ok_or(ConfigError::ZeroCapacity)?;
        if self.window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(capacity)
    }
}

// Runtime knobs handed to AppState
#[derive(Debug, Clone)]
pub struct Settings {
    pub submit_limit: u32,
    pub submit_limiter: LimiterConfig,
    pub ip_limit: u32,
    pub ip_limiter: LimiterConfig,
    pub registrations_open: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            submit_limit: 5,
            submit_limiter: LimiterConfig::default(),
            ip_limit: DEFAULT_IP_LIMIT,
            ip_limiter: LimiterConfig::new(10_000, Duration::from_millis(DEFAULT_WINDOW_MS)),
            registrations_open: true,
        }
    }
}
