use crate::errors::AppError;
use crate::handlers::AppState;
use crate::webhook_models::{DedupCheckResponse, DuplicatePreventionPayload};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

/// Duplicate-prevention webhook.
///
/// Wire-compatible with the legacy workflow endpoint: callers POST
/// `{user_id, source_id, lead_data}` and receive the full check result
/// synchronously. Authentication: `X-Webhook-Token` header must match
/// WEBHOOK_SECRET when one is configured.
pub async fn duplicate_prevention_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<DuplicatePreventionPayload>,
) -> Result<(StatusCode, Json<DedupCheckResponse>), AppError> {
    tracing::info!(user_id = %payload.user_id, "Received duplicate-prevention webhook");

    validate_webhook_secret(&state, &headers)?;

    let mut candidate = payload.lead_data;
    // The webhook carries source_id at the top level; fold it into the
    // candidate so velocity tracking sees it.
    if candidate.source_id.is_none() {
        candidate.source_id = payload.source_id.clone();
    }

    let result = state.check_and_record(&payload.user_id, &candidate).await?;

    Ok((StatusCode::OK, Json(DedupCheckResponse::from(&result))))
}

/// Validate webhook secret from X-Webhook-Token header
fn validate_webhook_secret(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    // If no secret is configured, skip validation (warn was already logged at startup)
    let Some(ref expected_secret) = state.config.webhook_secret else {
        return Ok(());
    };

    let token = headers
        .get("X-Webhook-Token")
        .or_else(|| headers.get("x-webhook-token"))
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing X-Webhook-Token header".to_string()))?;

    // Constant-time comparison to prevent timing attacks
    if !constant_time_compare(token, expected_secret) {
        tracing::warn!("Invalid webhook token received");
        return Err(AppError::Unauthorized("Invalid webhook token".to_string()));
    }

    Ok(())
}

/// Constant-time string comparison (basic implementation)
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
