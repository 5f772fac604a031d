use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::Matcher;
use crate::models::{ErrorResponse, HealthResponse, MatchEmailRequest, MatchEmailResponse, StoredMatchesResponse};
use crate::services::{PostgresClient, StoreError};
use crate::tenant::{resolve_tenant, TenantId};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub matcher: Matcher,
    pub jwt_secret: String,
    pub default_limit: u16,
    pub max_limit: u16,
}

/// Configure all email-matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/emails/{id}/match", web::post().to(match_email))
        .route("/emails/{id}/matches", web::get().to(get_matches))
        .route("/emails/{id}", web::get().to(get_email));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Trigger matching for one email
///
/// POST /api/v1/emails/{id}/match
///
/// Requires tenant context (X-Tenant-Id header or bearer token claim).
/// Optional request body:
/// ```json
/// { "limit": 20 }
/// ```
///
/// Reads a fresh snapshot of the tenant's active catalog, ranks it
/// against the email's extraction, replaces the stored results in full,
/// and returns the ranked list.
async fn match_email(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
    http_req: actix_web::HttpRequest,
) -> impl Responder {
    let tenant = match require_tenant(&state, &http_req) {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    let email_id = path.into_inner();
    if email_id.trim().is_empty() {
        return bad_request("Invalid email id", "Email id must be non-empty");
    }

    // An absent body means defaults; a present but malformed one is a
    // client error, not something to paper over.
    let request = match parse_match_request(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::info!("Malformed match request body: {}", e);
            return bad_request("invalid_json", &format!("Invalid JSON: {}", e));
        }
    };
    if let Err(errors) = request.validate() {
        tracing::info!("Validation failed for match request: {:?}", errors);
        return bad_request("Validation failed", &errors.to_string());
    }

    let limit = request
        .limit
        .unwrap_or(state.default_limit)
        .min(state.max_limit) as usize;

    tracing::info!(
        "Matching email {} for tenant {}, limit {}",
        email_id,
        tenant,
        limit
    );

    // InvalidTenant check: the tenant must exist before any matching runs
    match state.postgres.tenant_exists(tenant.as_str()).await {
        Ok(true) => {}
        Ok(false) => {
            return bad_request("Invalid tenant", &format!("Unknown tenant: {}", tenant));
        }
        Err(e) => {
            tracing::error!("Tenant lookup failed for {}: {}", tenant, e);
            return store_error_response(e);
        }
    }

    let email = match state.postgres.get_email(&email_id, tenant.as_str()).await {
        Ok(email) => email,
        Err(e) => return store_error_response(e),
    };

    let packages = match state.postgres.list_active_packages(tenant.as_str()).await {
        Ok(packages) => packages,
        Err(e) => {
            tracing::error!("Failed to load catalog for tenant {}: {}", tenant, e);
            return store_error_response(e);
        }
    };

    // A missing extraction degrades to an empty one: every criterion is
    // non-evaluable, so the run yields an empty list rather than an error.
    let extraction = email.extraction.unwrap_or_default();

    let outcome = state
        .matcher
        .rank(tenant.as_str(), &extraction, packages, limit);

    if let Err(e) = state
        .postgres
        .save_matches(&email_id, tenant.as_str(), &outcome.matches)
        .await
    {
        tracing::error!("Failed to save matches for email {}: {}", email_id, e);
        return store_error_response(e);
    }

    tracing::info!(
        "Matched email {} for tenant {}: {} results from {} candidates",
        email_id,
        tenant,
        outcome.matches.len(),
        outcome.total_candidates
    );

    HttpResponse::Ok().json(MatchEmailResponse {
        matches: outcome.matches,
        total_candidates: outcome.total_candidates,
    })
}

/// Fetch one email record, including its last-saved match results
///
/// GET /api/v1/emails/{id}
///
/// Returns the stored state; never recomputes matches.
async fn get_email(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: actix_web::HttpRequest,
) -> impl Responder {
    let tenant = match require_tenant(&state, &http_req) {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state.postgres.get_email(&path.into_inner(), tenant.as_str()).await {
        Ok(email) => HttpResponse::Ok().json(email),
        Err(e) => store_error_response(e),
    }
}

/// Fetch just the stored match results of one email
///
/// GET /api/v1/emails/{id}/matches
async fn get_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: actix_web::HttpRequest,
) -> impl Responder {
    let tenant = match require_tenant(&state, &http_req) {
        Ok(tenant) => tenant,
        Err(response) => return response,
    };

    match state.postgres.get_email(&path.into_inner(), tenant.as_str()).await {
        Ok(email) => HttpResponse::Ok().json(StoredMatchesResponse {
            email_id: email.id,
            matches: email.match_results,
            matched_at: email.matched_at,
        }),
        Err(e) => store_error_response(e),
    }
}

/// Parse the optional match-trigger body. Empty bodies fall back to the
/// request defaults; anything present must be valid JSON.
fn parse_match_request(body: &[u8]) -> Result<MatchEmailRequest, serde_json::Error> {
    if body.is_empty() {
        return Ok(MatchEmailRequest::default());
    }
    serde_json::from_slice(body)
}

fn require_tenant(
    state: &AppState,
    http_req: &actix_web::HttpRequest,
) -> Result<TenantId, HttpResponse> {
    resolve_tenant(http_req, &state.jwt_secret).map_err(|e| {
        tracing::info!("Tenant resolution failed on {}: {}", http_req.path(), e);
        bad_request("Tenant resolution failed", &e.to_string())
    })
}

fn bad_request(error: &str, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: 400,
    })
}

fn store_error_response(e: StoreError) -> HttpResponse {
    match e {
        // A tenant mismatch is reported exactly like an absent email so
        // the response does not reveal that the id exists elsewhere.
        StoreError::NotFound(_) | StoreError::TenantMismatch(_) => {
            HttpResponse::NotFound().json(ErrorResponse {
                error: "Email not found".to_string(),
                message: "No such email in this tenant".to_string(),
                status_code: 404,
            })
        }
        other => {
            tracing::error!("Storage failure: {}", other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Storage failure".to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_parse_match_request_empty_body_defaults() {
        let request = parse_match_request(b"").unwrap();
        assert_eq!(request.limit, None);
    }

    #[test]
    fn test_parse_match_request_reads_limit() {
        let request = parse_match_request(br#"{"limit": 10}"#).unwrap();
        assert_eq!(request.limit, Some(10));
    }

    #[test]
    fn test_parse_match_request_rejects_malformed_body() {
        assert!(parse_match_request(b"{not json").is_err());
        assert!(parse_match_request(br#"{"limit": "ten"}"#).is_err());
    }

    #[test]
    fn test_not_found_and_mismatch_render_identically() {
        let not_found = store_error_response(StoreError::NotFound("email x".into()));
        let mismatch = store_error_response(StoreError::TenantMismatch("email x".into()));

        assert_eq!(not_found.status(), mismatch.status());
        assert_eq!(not_found.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
