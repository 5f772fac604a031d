use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{EmailRecord, Extraction, MatchResult, Package, PackageStatus};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Tenant mismatch: {0}")]
    TenantMismatch(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// PostgreSQL client for the package catalog and email records
///
/// Every query takes a tenant identifier and filters on it; no method on
/// this client can read or write another tenant's rows.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Check whether a tenant exists
    pub async fn tenant_exists(&self, tenant_id: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 AS one FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Load the active packages of one tenant, ordered by id
    ///
    /// A fresh snapshot is read on every call; match runs never see
    /// stale or cached catalog state.
    pub async fn list_active_packages(&self, tenant_id: &str) -> Result<Vec<Package>, StoreError> {
        let query = r#"
            SELECT id, tenant_id, title, destination, price, currency,
                   duration_days, capacity, status, available_from,
                   available_to, created_at
            FROM packages
            WHERE tenant_id = $1 AND status = 'active'
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;

        let packages: Result<Vec<Package>, StoreError> =
            rows.iter().map(row_to_package).collect();

        let packages = packages?;
        tracing::debug!(
            "Loaded {} active packages for tenant {}",
            packages.len(),
            tenant_id
        );

        Ok(packages)
    }

    /// Load one email record, including its last-saved match results
    ///
    /// Fails with `NotFound` when the email does not exist for that
    /// tenant; an email owned by another tenant is indistinguishable
    /// from an absent one on the read path.
    pub async fn get_email(
        &self,
        email_id: &str,
        tenant_id: &str,
    ) -> Result<EmailRecord, StoreError> {
        let query = r#"
            SELECT id, tenant_id, subject, sender, received_at,
                   extraction, match_results, matched_at
            FROM emails
            WHERE id = $1 AND tenant_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(email_id)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row_to_email(&row),
            None => Err(StoreError::NotFound(format!(
                "email {} not found for tenant {}",
                email_id, tenant_id
            ))),
        }
    }

    /// Replace an email's stored match results in full
    ///
    /// A single UPDATE keyed on (id, tenant_id): all-or-nothing,
    /// idempotent, last-write-wins under concurrent callers. When no row
    /// matches, a follow-up probe distinguishes an absent email from one
    /// owned by another tenant.
    pub async fn save_matches(
        &self,
        email_id: &str,
        tenant_id: &str,
        results: &[MatchResult],
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_value(results)?;

        let query = r#"
            UPDATE emails
            SET match_results = $3, matched_at = NOW()
            WHERE id = $1 AND tenant_id = $2
        "#;

        let outcome = sqlx::query(query)
            .bind(email_id)
            .bind(tenant_id)
            .bind(&payload)
            .execute(&self.pool)
            .await?;

        if outcome.rows_affected() == 0 {
            let owner = sqlx::query("SELECT tenant_id FROM emails WHERE id = $1")
                .bind(email_id)
                .fetch_optional(&self.pool)
                .await?;

            return match owner {
                None => Err(StoreError::NotFound(format!("email {} not found", email_id))),
                Some(_) => Err(StoreError::TenantMismatch(format!(
                    "email {} does not belong to tenant {}",
                    email_id, tenant_id
                ))),
            };
        }

        tracing::debug!(
            "Saved {} match results on email {} for tenant {}",
            results.len(),
            email_id,
            tenant_id
        );

        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn row_to_package(row: &PgRow) -> Result<Package, StoreError> {
    let status_raw: String = row.get("status");
    let status = PackageStatus::parse(&status_raw).ok_or_else(|| {
        StoreError::InvalidRecord(format!("unknown package status '{}'", status_raw))
    })?;

    Ok(Package {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        title: row.get("title"),
        destination: row.get("destination"),
        price: row.get("price"),
        currency: row.get("currency"),
        duration_days: row.get("duration_days"),
        capacity: row.get("capacity"),
        status,
        available_from: row.get("available_from"),
        available_to: row.get("available_to"),
        created_at: row.get("created_at"),
    })
}

fn row_to_email(row: &PgRow) -> Result<EmailRecord, StoreError> {
    let extraction: Option<Extraction> = match row.get::<Option<serde_json::Value>, _>("extraction") {
        Some(value) => Some(serde_json::from_value(value)?),
        None => None,
    };

    let match_results: Vec<MatchResult> =
        serde_json::from_value(row.get::<serde_json::Value, _>("match_results"))?;

    Ok(EmailRecord {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        subject: row.get("subject"),
        sender: row.get("sender"),
        received_at: row.get("received_at"),
        extraction,
        match_results,
        matched_at: row.get("matched_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_results_payload_round_trip() {
        let results = vec![MatchResult {
            package_id: "pkg-1".to_string(),
            score: 95,
            itinerary_title: "Paris Getaway".to_string(),
            destination: "Paris".to_string(),
            price: 1800.0,
            currency: "USD".to_string(),
            duration: 5,
            match_reasons: vec!["Destination matches".to_string(), "Within budget".to_string()],
        }];

        let payload = serde_json::to_value(&results).unwrap();
        let back: Vec<MatchResult> = serde_json::from_value(payload).unwrap();

        assert_eq!(back, results);
    }

    #[test]
    fn test_extraction_column_deserializes_partial_fields() {
        // Upstream extraction writes only the fields it managed to parse.
        let value = serde_json::json!({
            "destination": "paris",
            "budget": { "amount": 2000.0, "currency": "USD" }
        });

        let extraction: Extraction = serde_json::from_value(value).unwrap();
        assert_eq!(extraction.destination.as_deref(), Some("paris"));
        assert!(extraction.duration_days.is_none());
        assert!(extraction.start_date.is_none());
    }
}
