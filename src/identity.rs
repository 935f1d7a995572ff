use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};

use crate::error::ConfigError;

// fallback when there is no X-Forwarded-For
pub const LOCAL_IP: &str = "127.0.0.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Principal>;
}

// email header set by the auth proxy in front of us; the proxy must strip it from client input
pub struct ForwardedIdentity {
    header: HeaderName,
}

impl ForwardedIdentity {
    pub fn new(header: &str) -> Result<Self, ConfigError> {
        let header = HeaderName::try_from(header)
            .map_err(|_| ConfigError::InvalidHeader(header.to_owned()))?;
        Ok(Self { header })
    }
}

#[async_trait]
impl IdentityProvider for ForwardedIdentity {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        let email = headers.get(&self.header)?.to_str().ok()?.trim();
        if email.is_empty() || !email.contains('@') {
            return None;
        }
        Some(Principal {
            email: email.to_owned(),
        })
    }
}

// First hop of X-Forwarded-For, if any
pub fn client_ip(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
}

// Throttling key for one principal at one network origin
pub fn identity_key(ip: &str, principal: &Principal) -> String {
    format!("{}:{}", ip, principal.email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn first_forwarded_hop_wins() {
        let h = headers(&[("x-forwarded-for", " 203.0.113.7 , 10.0.0.1")]);
        assert_eq!(client_ip(&h), Some("203.0.113.7"));
    }

    #[test]
    fn missing_or_blank_forwarded_for() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
        assert_eq!(client_ip(&headers(&[("x-forwarded-for", " ,1.2.3.4")])), None);
    }

    #[test]
    fn key_joins_ip_and_email() {
        let principal = Principal { email: "a@b.co".into() };
        assert_eq!(identity_key("1.2.3.4", &principal), "1.2.3.4:a@b.co");
    }

    #[tokio::test]
    async fn forwarded_identity_reads_header() {
        let provider = ForwardedIdentity::new("x-auth-request-email").unwrap();
        let h = headers(&[("x-auth-request-email", "ada@example.com")]);
        assert_eq!(
            provider.authenticate(&h).await,
            Some(Principal { email: "ada@example.com".into() })
        );
    }

    #[tokio::test]
    async fn forwarded_identity_rejects_missing_or_malformed() {
        let provider = ForwardedIdentity::new("x-auth-request-email").unwrap();
        assert_eq!(provider.authenticate(&HeaderMap::new()).await, None);
        let h = headers(&[("x-auth-request-email", "   ")]);
        assert_eq!(provider.authenticate(&h).await, None);
        let h = headers(&[("x-auth-request-email", "not-an-email")]);
        assert_eq!(provider.authenticate(&h).await, None);
    }

    #[test]
    fn invalid_header_name_is_config_error() {
        assert!(matches!(
            ForwardedIdentity::new("bad header"),
            Err(ConfigError::InvalidHeader(_))
        ));
    }
}
