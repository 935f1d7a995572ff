use std::sync::Arc;
use crate::config::Settings;
use crate::error::ConfigError;
use crate::identity::IdentityProvider;
use crate::rate_limit::RateLimiter;
use crate::store::SubmissionStore;
use crate::verifier::BotVerifier;
// app's shared state

pub struct AppState {
    pub submit_limiter: RateLimiter, // ip + email -> attempts
    pub submit_limit: u32,
    pub ip_limiter: RateLimiter,     // ip -> /api requests
    pub ip_limit: u32,
    pub identity: Arc<dyn IdentityProvider>,
    pub verifier: Arc<dyn BotVerifier>,
    pub store: Arc<dyn SubmissionStore>,
    pub registrations_open: bool,
}

impl AppState {
    pub fn new(
        settings: Settings,
        identity: Arc<dyn IdentityProvider>,
        verifier: Arc<dyn BotVerifier>,
        store: Arc<dyn SubmissionStore>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            submit_limiter: RateLimiter::new(settings.submit_limiter)?,
            submit_limit: settings.submit_limit,
            ip_limiter: RateLimiter::new(settings.ip_limiter)?,
            ip_limit: settings.ip_limit,
            identity,
            verifier,
            store,
            registrations_open: settings.registrations_open,
        })
    }
}
