use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::config::LimiterConfig;
use crate::error::ConfigError;
use crate::registry::TokenRegistry;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("rate limit exceeded")]
pub struct RateLimited;

#[derive(Clone)]
pub struct RateLimiter {
    registry: Arc<TokenRegistry>,
}

impl RateLimiter {
    pub fn new(config: LimiterConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_registry(Arc::new(TokenRegistry::new(config)?)))
    }

    pub fn with_registry(registry: Arc<TokenRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<TokenRegistry> {
        &self.registry
    }

    // fixed window: first hit opens it at 1, admitted hits bump the count and
    // restart the ttl, hits at or over the limit are rejected until expiry
    pub fn check(&self, key: &str, limit: u32) -> Result<(), RateLimited> {
        // read and write under the same lock so racing hits cannot both
        // observe the same count
        let mut entries = self.registry.entries();
        match entries.get(key) {
            None => {
                entries.set(key, 1);
                Ok(())
            }
            Some(count) if count < limit => {
                entries.set(key, count + 1);
                Ok(())
            }
            Some(count) => {
                drop(entries);
                debug!(key = %fingerprint(key), count, limit, "rate limited");
                Err(RateLimited)
            }
        }
    }
}

// Short stable digest of a limiter key, so logs never carry the raw email
pub fn fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest[..6].iter().map(|b| format!("{:02x}", b)).collect()
}
