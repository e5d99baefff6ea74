use crate::normalizer::NormalizedLead;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lead lifecycle status. Leads are never hard-deleted; they only move
/// through these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
    Rejected,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
            LeadStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "qualified" => Some(LeadStatus::Qualified),
            "converted" => Some(LeadStatus::Converted),
            "rejected" => Some(LeadStatus::Rejected),
            _ => None,
        }
    }

    /// Lifecycle: new -> contacted -> qualified -> converted, with rejection
    /// allowed from any non-terminal state. Converted and rejected are final.
    pub fn can_transition_to(&self, next: LeadStatus) -> bool {
        matches!(
            (self, next),
            (LeadStatus::New, LeadStatus::Contacted)
                | (LeadStatus::Contacted, LeadStatus::Qualified)
                | (LeadStatus::Qualified, LeadStatus::Converted)
                | (LeadStatus::New, LeadStatus::Rejected)
                | (LeadStatus::Contacted, LeadStatus::Rejected)
                | (LeadStatus::Qualified, LeadStatus::Rejected)
        )
    }
}

/// Incoming candidate lead as submitted by callers.
/// At least one of email or phone is required; everything else is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CandidateLead {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub source_id: Option<String>,
}

impl CandidateLead {
    pub fn normalized(&self) -> NormalizedLead {
        NormalizedLead::new(
            self.email.as_deref(),
            self.phone.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.company.as_deref(),
        )
    }
}

/// A persisted, tenant-scoped lead row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: Uuid,
    pub tenant_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub source_id: Option<String>,
    pub status: String,
    /// Quality score in [1, 100].
    pub lead_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn normalized(&self) -> NormalizedLead {
        NormalizedLead::new(
            self.email.as_deref(),
            self.phone.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.company.as_deref(),
        )
    }

    pub fn status(&self) -> Option<LeadStatus> {
        LeadStatus::parse(&self.status)
    }
}

/// Query parameters for the tenant-scoped lead listing.
#[derive(Debug, Deserialize)]
pub struct LeadQueryParams {
    pub tenant_id: String,
    pub status: Option<String>,
    pub min_score: Option<i32>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// Body for POST /api/v1/dedup/check and POST /api/v1/leads.
#[derive(Debug, Deserialize)]
pub struct DedupCheckRequest {
    pub tenant_id: String,
    pub candidate_lead: CandidateLead,
}

/// Body for PATCH /api/v1/leads/:id/status.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub tenant_id: String,
    pub status: LeadStatus,
}
