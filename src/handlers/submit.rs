use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use crate::error::{ApiError, ApiResult};
use crate::identity::{LOCAL_IP, client_ip, identity_key};
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_LATENCY, REQUEST_TOTAL, SUBMISSIONS_TOTAL};
use crate::models::{ApplicationForm, SubmissionRecord, SubmissionStatus, SubmitResponse};
use crate::rate_limit::fingerprint;
use crate::state::AppState;
use crate::store::StoreError;
use crate::validation::{FieldErrors, validate};

// Body is taken raw so auth and throttling run before any parsing
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<SubmitResponse>> {
    REQUEST_TOTAL.inc();

    let principal = state
        .identity
        .authenticate(&headers)
        .await
        .ok_or(ApiError::Unauthenticated)?;

    if !state.registrations_open {
        return Err(ApiError::RegistrationsClosed);
    }

    let ip = client_ip(&headers).unwrap_or(LOCAL_IP);
    let key = identity_key(ip, &principal);
    if state.submit_limiter.check(&key, state.submit_limit).is_err() {
        RATE_LIMITED_TOTAL.with_label_values(&["submit"]).inc();
        return Err(ApiError::TooManyRequests);
    }

    let start_time = Instant::now();

    let form: ApplicationForm = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "unparseable application body");
        ApiError::InvalidForm(FieldErrors::default())
    })?;
    validate(&form).map_err(ApiError::InvalidForm)?;

    let human = state
        .verifier
        .verify(&form.recaptcha_token, ip)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !human {
        debug!(key = %fingerprint(&key), "bot verification failed");
        return Err(ApiError::VerificationFailed);
    }

    let record = SubmissionRecord::from_form(form, &principal.email);
    match state.store.create(&principal.email, record).await {
        Ok(()) => {}
        Err(StoreError::AlreadySubmitted) => return Err(ApiError::AlreadySubmitted),
        Err(e) => {
            warn!(key = %fingerprint(&key), "store rejected application");
            return Err(ApiError::Internal(e.to_string()));
        }
    }

    SUBMISSIONS_TOTAL.inc();
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    info!(key = %fingerprint(&key), "application stored");

    Ok(Json(SubmitResponse {
        message: "Application submitted successfully".to_string(),
    }))
}

pub async fn check_submission_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<SubmissionStatus>> {
    let principal = state
        .identity
        .authenticate(&headers)
        .await
        .ok_or(ApiError::Unauthenticated)?;

    let has_submitted = state
        .store
        .exists(&principal.email)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(SubmissionStatus {
        has_submitted,
        registrations_open: state.registrations_open,
    }))
}
