//! Seed a tenant with sample leads for local testing.
//!
//! Usage: cargo run --bin seed_leads -- <tenant_id>

use leadfly_dedup_api::config::Config;
use leadfly_dedup_api::db::Database;
use leadfly_dedup_api::db_storage::PgLeadStore;
use leadfly_dedup_api::models::CandidateLead;
use leadfly_dedup_api::scoring::score_lead;

fn sample_leads() -> Vec<CandidateLead> {
    let rows: Vec<(&str, &str, &str, &str, &str, &str)> = vec![
        (
            "john.doe@acmecorp.com",
            "+1-555-123-4567",
            "John",
            "Doe",
            "Acme Corporation",
            "VP of Sales",
        ),
        (
            "jane.smith@testcompany.com",
            "(555) 987-6543",
            "Jane",
            "Smith",
            "Test Company Inc",
            "Director of Marketing",
        ),
        (
            "bob.wilson@differentco.com",
            "555.222.3344",
            "Bob",
            "Wilson",
            "Different Co",
            "Account Manager",
        ),
        (
            "ceo@newcorp.com",
            "+1-555-999-8888",
            "Alice",
            "Nguyen",
            "New Corp LLC",
            "CEO",
        ),
    ];

    rows.into_iter()
        .map(|(email, phone, first, last, company, title)| CandidateLead {
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            company: Some(company.to_string()),
            job_title: Some(title.to_string()),
            source_id: Some("seed".to_string()),
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let tenant_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demo-tenant".to_string());

    let config = Config::from_env()?;
    let db = Database::new(&config.database_url).await?;
    let store = PgLeadStore::new(db.pool.clone());

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for candidate in sample_leads() {
        let score = score_lead(&candidate);
        match store.insert_lead(&tenant_id, &candidate, score).await {
            Ok(Some(lead)) => {
                inserted += 1;
                tracing::info!(
                    "Inserted lead {} ({:?}) score={}",
                    lead.id,
                    lead.email,
                    lead.lead_score
                );
            }
            Ok(None) => {
                skipped += 1;
                tracing::info!("Skipped duplicate {:?}", candidate.email);
            }
            Err(e) => {
                tracing::error!("Failed to insert {:?}: {}", candidate.email, e);
            }
        }
    }

    tracing::info!(
        "Seeding complete for tenant {}: {} inserted, {} skipped",
        tenant_id,
        inserted,
        skipped
    );

    Ok(())
}
