use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Optional shared secret for the duplicate-prevention webhook.
    pub webhook_secret: Option<String>,
    /// How far back the matcher searches a tenant's prior leads, in days.
    pub lookback_days: u32,
    /// Hard cap on prior leads considered per check.
    pub lookback_limit: u32,
    /// Submissions per minute from the same tenant+source above which the
    /// velocity risk factor triggers.
    pub velocity_threshold: u32,
    /// When true, a store outage degrades checks to flag_for_review instead
    /// of returning a retryable error. Never degrades to allow_processing.
    pub fail_closed: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DB_URL")
                .or_else(|_| std::env::var("DATABASE_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DB_URL or DATABASE_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DB_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            webhook_secret: std::env::var("WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            lookback_days: std::env::var("DEDUP_LOOKBACK_DAYS")
                .unwrap_or_else(|_| "90".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DEDUP_LOOKBACK_DAYS must be a positive number"))?,
            lookback_limit: std::env::var("DEDUP_LOOKBACK_LIMIT")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DEDUP_LOOKBACK_LIMIT must be a positive number"))?,
            velocity_threshold: std::env::var("DEDUP_VELOCITY_THRESHOLD")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| {
                    anyhow::anyhow!("DEDUP_VELOCITY_THRESHOLD must be a positive number")
                })?,
            fail_closed: std::env::var("DEDUP_FAIL_CLOSED")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database URL: {}...",
            &config.database_url[..20.min(config.database_url.len())]
        );
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Lookback: {} days / {} leads, velocity threshold: {}/min, fail_closed: {}",
            config.lookback_days,
            config.lookback_limit,
            config.velocity_threshold,
            config.fail_closed
        );
        if config.webhook_secret.is_none() {
            tracing::warn!("WEBHOOK_SECRET not set; webhook token validation disabled");
        }

        Ok(config)
    }
}
