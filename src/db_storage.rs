/// Postgres-backed lead storage.
///
/// Implements the engine's read-only `LeadHistory` dependency and carries the
/// write paths the HTTP layer needs: inserting leads (guarded by the unique
/// tenant+email index), lifecycle updates, listings, and per-check receipt
/// rows that feed auditing.
///
/// History reads go through a circuit breaker so a database outage fails
/// fast into the engine's DependencyUnavailable handling.
use crate::circuit_breaker::{create_store_circuit_breaker, StoreCircuitBreaker};
use crate::decision::DecisionResult;
use crate::dedup::{LeadHistory, LookbackWindow};
use crate::errors::{AppError, ResultExt};
use crate::models::{CandidateLead, Lead, LeadQueryParams, LeadStatus};
use crate::normalizer::{normalize_email, normalize_phone};
use failsafe::futures::CircuitBreaker;
use sqlx::PgPool;
use uuid::Uuid;

const LEAD_COLUMNS: &str = "id, tenant_id, email, phone, first_name, last_name, company, \
     job_title, source_id, status, lead_score, created_at, updated_at";

#[derive(Clone)]
pub struct PgLeadStore {
    pool: PgPool,
    breaker: StoreCircuitBreaker,
}

impl PgLeadStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            breaker: create_store_circuit_breaker(),
        }
    }

    /// Insert a new lead. Returns `None` when the unique index on
    /// (tenant_id, normalized email) rejects the row; that index is the
    /// authoritative duplicate guard for the check-then-act race between
    /// concurrent submissions of the same identity.
    pub async fn insert_lead(
        &self,
        tenant_id: &str,
        candidate: &CandidateLead,
        lead_score: i32,
    ) -> Result<Option<Lead>, AppError> {
        let email_normalized = normalize_email(candidate.email.as_deref().unwrap_or_default());
        let phone_normalized = normalize_phone(candidate.phone.as_deref().unwrap_or_default());

        let query = format!(
            r#"
            INSERT INTO leads (
                tenant_id, email, phone, first_name, last_name, company,
                job_title, source_id, email_normalized, phone_normalized,
                status, lead_score
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'new', $11)
            ON CONFLICT DO NOTHING
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );

        let lead = sqlx::query_as::<_, Lead>(&query)
            .bind(tenant_id)
            .bind(&candidate.email)
            .bind(&candidate.phone)
            .bind(&candidate.first_name)
            .bind(&candidate.last_name)
            .bind(&candidate.company)
            .bind(&candidate.job_title)
            .bind(&candidate.source_id)
            .bind(email_normalized)
            .bind(phone_normalized)
            .bind(lead_score)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to insert lead")?;

        if lead.is_none() {
            tracing::info!(tenant_id, "Lead insert rejected by unique index (duplicate)");
        }

        Ok(lead)
    }

    pub async fn get_lead(&self, tenant_id: &str, id: Uuid) -> Result<Option<Lead>, AppError> {
        let query = format!(
            "SELECT {} FROM leads WHERE tenant_id = $1 AND id = $2",
            LEAD_COLUMNS
        );
        let lead = sqlx::query_as::<_, Lead>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load lead {}", id))?;
        Ok(lead)
    }

    /// Apply a lifecycle status update. Transition validity is checked by
    /// the caller against the current status.
    pub async fn set_status(
        &self,
        tenant_id: &str,
        id: Uuid,
        status: LeadStatus,
    ) -> Result<Lead, AppError> {
        let query = format!(
            r#"
            UPDATE leads
            SET status = $3, updated_at = now()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );
        let lead = sqlx::query_as::<_, Lead>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to update status of lead {}", id))?
            .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))?;
        Ok(lead)
    }

    /// Tenant-scoped listing with optional status / min_score filters.
    pub async fn list_leads(&self, params: &LeadQueryParams) -> Result<Vec<Lead>, AppError> {
        let limit = params.limit.clamp(1, 200) as i64;
        let offset = (params.page.max(1) as i64 - 1) * limit;

        let query = format!(
            r#"
            SELECT {}
            FROM leads
            WHERE tenant_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::int IS NULL OR lead_score >= $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
            LEAD_COLUMNS
        );

        let leads = sqlx::query_as::<_, Lead>(&query)
            .bind(&params.tenant_id)
            .bind(&params.status)
            .bind(params.min_score)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list leads")?;

        Ok(leads)
    }

    /// Store one receipt row per check for auditing. Failures here are
    /// logged, not propagated; the decision has already been made.
    pub async fn record_check(
        &self,
        tenant_id: &str,
        source_id: Option<&str>,
        candidate: &CandidateLead,
        result: &DecisionResult,
    ) {
        let email_normalized = normalize_email(candidate.email.as_deref().unwrap_or_default());

        let outcome = sqlx::query(
            r#"
            INSERT INTO dedup_checks (
                tenant_id, source_id, email_normalized, action_taken,
                duplicate_found, confidence_score, risk_level, risk_score,
                matched_lead_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(tenant_id)
        .bind(source_id)
        .bind(email_normalized)
        .bind(result.action_taken.as_str())
        .bind(result.duplicate_found)
        .bind(result.confidence_score)
        .bind(result.risk_level.as_str())
        .bind(result.risk_score as i32)
        .bind(result.matched_lead_id)
        .execute(&self.pool)
        .await;

        match outcome {
            Ok(_) => tracing::debug!(tenant_id, "Stored dedup check receipt"),
            Err(e) => tracing::error!(tenant_id, "Failed to store dedup check receipt: {}", e),
        }
    }
}

impl LeadHistory for PgLeadStore {
    /// Read-only history query within the lookback window. Rejected leads
    /// still participate in matching: a rejected duplicate is exactly the
    /// kind of record a resubmission should collide with.
    async fn recent_leads(
        &self,
        tenant_id: &str,
        window: LookbackWindow,
    ) -> Result<Vec<Lead>, AppError> {
        let query = format!(
            r#"
            SELECT {}
            FROM leads
            WHERE tenant_id = $1
              AND created_at > now() - make_interval(days => $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            LEAD_COLUMNS
        );

        let result = self
            .breaker
            .call(
                sqlx::query_as::<_, Lead>(&query)
                    .bind(tenant_id)
                    .bind(window.days as i32)
                    .bind(window.limit as i64)
                    .fetch_all(&self.pool),
            )
            .await;

        match result {
            Ok(leads) => Ok(leads),
            Err(failsafe::Error::Inner(e)) => Err(AppError::DatabaseError(e)),
            Err(failsafe::Error::Rejected) => Err(AppError::DependencyUnavailable(
                "lead store circuit open".to_string(),
            )),
        }
    }
}
