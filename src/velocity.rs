/// In-process submission-velocity counter.
///
/// Counts submissions per tenant+source in one-minute buckets, backed by a
/// TTL cache so idle keys expire on their own. This is the production
/// implementation of the `SubmissionVelocity` read dependency; the recording
/// side is called by the HTTP layer after each check.
use crate::dedup::SubmissionVelocity;
use crate::errors::AppError;
use chrono::Utc;
use moka::future::Cache;
use std::time::Duration;

#[derive(Clone)]
pub struct MokaVelocity {
    buckets: Cache<String, u32>,
}

impl MokaVelocity {
    pub fn new() -> Self {
        // Two-minute TTL comfortably covers the trailing-minute window.
        let buckets = Cache::builder()
            .time_to_live(Duration::from_secs(120))
            .max_capacity(100_000)
            .build();
        Self { buckets }
    }

    fn bucket_key(tenant_id: &str, source_id: &str) -> String {
        let minute = Utc::now().timestamp() / 60;
        format!("{}:{}:{}", tenant_id, source_id, minute)
    }

    /// Record one submission for the current minute bucket.
    ///
    /// Read-modify-write is not atomic; under concurrency the count may
    /// undercount slightly, which only makes the heuristic more permissive.
    pub async fn record(&self, tenant_id: &str, source_id: &str) {
        let key = Self::bucket_key(tenant_id, source_id);
        let current = self.buckets.get(&key).await.unwrap_or(0);
        self.buckets.insert(key, current + 1).await;
    }
}

impl Default for MokaVelocity {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionVelocity for MokaVelocity {
    async fn recent_count(&self, tenant_id: &str, source_id: &str) -> Result<u32, AppError> {
        let key = Self::bucket_key(tenant_id, source_id);
        Ok(self.buckets.get(&key).await.unwrap_or(0))
    }
}
