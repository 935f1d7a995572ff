use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const RECAPTCHA_ENDPOINT: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("verification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait BotVerifier: Send + Sync {
    // Ok(false) = checked and judged a bot
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<bool, VerifyError>;
}

// siteverify response body
#[derive(Deserialize, Debug)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

pub struct RecaptchaVerifier {
    client: reqwest::Client,
    secret: String,
    min_score: f64,
    endpoint: String,
}

impl RecaptchaVerifier {
    pub fn new(client: reqwest::Client, secret: String, min_score: f64) -> Self {
        Self::with_endpoint(client, secret, min_score, RECAPTCHA_ENDPOINT.to_string())
    }

    pub fn with_endpoint(
        client: reqwest::Client,
        secret: String,
        min_score: f64,
        endpoint: String,
    ) -> Self {
        Self {
            client,
            secret,
            min_score,
            endpoint,
        }
    }
}

#[async_trait]
impl BotVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<bool, VerifyError> {
        let body: SiteVerifyResponse = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("secret", self.secret.as_str()),
                ("response", token),
                ("remoteip", remote_ip),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // v2 tokens carry no score; success alone decides
        let passed = body.success && body.score.is_none_or(|score| score >= self.min_score);
        if !passed {
            debug!(score = ?body.score, errors = ?body.error_codes, "recaptcha rejected token");
        }
        Ok(passed)
    }
}

// Fixed verdict, for local runs without a secret and for tests
pub struct StaticVerifier {
    verdict: bool,
}

impl StaticVerifier {
    pub fn accept_all() -> Self {
        Self { verdict: true }
    }

    pub fn reject_all() -> Self {
        Self { verdict: false }
    }
}

#[async_trait]
impl BotVerifier for StaticVerifier {
    async fn verify(&self, _token: &str, _remote_ip: &str) -> Result<bool, VerifyError> {
        Ok(self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Form, Json, Router, routing::post};
    use std::collections::HashMap;

    // Fake siteverify: token "human" scores 0.9, "bot" scores 0.1, "v2" has no score
    async fn siteverify(Form(params): Form<HashMap<String, String>>) -> Json<serde_json::Value> {
        assert_eq!(params.get("secret").map(String::as_str), Some("s3cret"));
        assert_eq!(params.get("remoteip").map(String::as_str), Some("203.0.113.9"));
        let body = match params.get("response").map(String::as_str) {
            Some("human") => serde_json::json!({ "success": true, "score": 0.9 }),
            Some("bot") => serde_json::json!({ "success": true, "score": 0.1 }),
            Some("v2") => serde_json::json!({ "success": true }),
            _ => serde_json::json!({ "success": false, "error-codes": ["invalid-input-response"] }),
        };
        Json(body)
    }

    async fn spawn_siteverify() -> String {
        let app = Router::new().route("/siteverify", post(siteverify));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/siteverify", addr)
    }

    #[tokio::test]
    async fn recaptcha_verdicts() {
        let endpoint = spawn_siteverify().await;
        let verifier =
            RecaptchaVerifier::with_endpoint(reqwest::Client::new(), "s3cret".into(), 0.5, endpoint);

        assert!(verifier.verify("human", "203.0.113.9").await.unwrap());
        assert!(!verifier.verify("bot", "203.0.113.9").await.unwrap());
        assert!(verifier.verify("v2", "203.0.113.9").await.unwrap());
        assert!(!verifier.verify("garbage", "203.0.113.9").await.unwrap());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let verifier = RecaptchaVerifier::with_endpoint(
            reqwest::Client::new(),
            "s3cret".into(),
            0.5,
            format!("http://{}/siteverify", addr),
        );
        assert!(matches!(
            verifier.verify("human", "203.0.113.9").await,
            Err(VerifyError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn static_verdicts() {
        assert!(StaticVerifier::accept_all().verify("t", "ip").await.unwrap());
        assert!(!StaticVerifier::reject_all().verify("t", "ip").await.unwrap());
    }
}
