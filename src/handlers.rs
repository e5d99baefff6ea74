use crate::config::Config;
use crate::db_storage::PgLeadStore;
use crate::decision::DecisionAction;
use crate::dedup::{DedupEngine, DedupOptions, LookbackWindow};
use crate::errors::AppError;
use crate::models::{DedupCheckRequest, Lead, LeadQueryParams, StatusUpdateRequest};
use crate::scoring::score_lead;
use crate::velocity::MokaVelocity;
use crate::webhook_models::DedupCheckResponse;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Lead storage (history reads, inserts, listings, check receipts).
    pub store: PgLeadStore,
    /// In-process submission-velocity counter.
    pub velocity: MokaVelocity,
    /// The deduplication engine, wired to the store and velocity counter.
    pub engine: DedupEngine<PgLeadStore, MokaVelocity>,
}

impl AppState {
    pub fn new(store: PgLeadStore, velocity: MokaVelocity, config: Config) -> Self {
        let options = DedupOptions {
            lookback: LookbackWindow {
                days: config.lookback_days,
                limit: config.lookback_limit,
            },
            velocity_threshold: config.velocity_threshold,
            fail_closed: config.fail_closed,
        };
        let engine = DedupEngine::new(store.clone(), velocity.clone(), options);
        Self {
            config,
            store,
            velocity,
            engine,
        }
    }

    /// Run a check and perform the bookkeeping shared by every entry point:
    /// bump the velocity counter and store a receipt row.
    pub async fn check_and_record(
        &self,
        tenant_id: &str,
        candidate: &crate::models::CandidateLead,
    ) -> Result<crate::decision::DecisionResult, AppError> {
        let result = self.engine.check(tenant_id, candidate).await?;

        let source_id = candidate.source_id.as_deref();
        self.velocity
            .record(tenant_id, source_id.unwrap_or("unknown"))
            .await;
        self.store
            .record_check(tenant_id, source_id, candidate, &result)
            .await;

        Ok(result)
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "leadfly-dedup-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/dedup/check
///
/// Run the deduplication check without persisting the candidate.
pub async fn dedup_check(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DedupCheckRequest>,
) -> Result<Json<DedupCheckResponse>, AppError> {
    tracing::info!(tenant_id = %request.tenant_id, "POST /dedup/check");

    let result = state
        .check_and_record(&request.tenant_id, &request.candidate_lead)
        .await?;

    Ok(Json(DedupCheckResponse::from(&result)))
}

/// POST /api/v1/leads
///
/// Check, then persist unless the decision is reject_duplicate. The insert
/// relies on the unique tenant+email index as the authoritative duplicate
/// guard; when the index rejects the row the caller gets reject_duplicate
/// even though the advisory check said otherwise.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DedupCheckRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    tracing::info!(tenant_id = %request.tenant_id, "POST /leads");

    let result = state
        .check_and_record(&request.tenant_id, &request.candidate_lead)
        .await?;
    let decision = DedupCheckResponse::from(&result);

    if result.action_taken == DecisionAction::RejectDuplicate {
        return Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "decision": decision,
                "lead": serde_json::Value::Null,
            })),
        ));
    }

    let lead_score = score_lead(&request.candidate_lead);
    let inserted = state
        .store
        .insert_lead(&request.tenant_id, &request.candidate_lead, lead_score)
        .await?;

    match inserted {
        Some(lead) => Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "decision": decision,
                "lead": lead,
            })),
        )),
        // Lost the check-then-act race: another submission persisted the
        // same identity first.
        None => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "decision": decision,
                "lead": serde_json::Value::Null,
                "error": "Duplicate lead (unique index)",
            })),
        )),
    }
}

/// GET /api/v1/leads
///
/// Tenant-scoped listing with optional status and min_score filters.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeadQueryParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!(tenant_id = %params.tenant_id, "GET /leads");

    if let Some(ref status) = params.status {
        if crate::models::LeadStatus::parse(status).is_none() {
            return Err(AppError::BadRequest(format!(
                "Unknown status filter: {}",
                status
            )));
        }
    }

    let leads: Vec<Lead> = state.store.list_leads(&params).await?;

    Ok(Json(json!({
        "success": true,
        "count": leads.len(),
        "page": params.page,
        "limit": params.limit,
        "leads": leads,
    })))
}

/// PATCH /api/v1/leads/:id/status
///
/// Lifecycle transition. Leads are never deleted; invalid transitions are
/// rejected with the current status in the error message.
pub async fn update_lead_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!(tenant_id = %request.tenant_id, lead_id = %id, "PATCH /leads/:id/status");

    let lead = state
        .store
        .get_lead(&request.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))?;

    let current = lead
        .status()
        .ok_or_else(|| AppError::InternalError(format!("Lead {} has invalid status", id)))?;

    if !current.can_transition_to(request.status) {
        return Err(AppError::BadRequest(format!(
            "Invalid transition: {} -> {}",
            current.as_str(),
            request.status.as_str()
        )));
    }

    let updated = state.store.set_status(&request.tenant_id, id, request.status).await?;

    Ok(Json(json!({
        "success": true,
        "lead": updated,
    })))
}
