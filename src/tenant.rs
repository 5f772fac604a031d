use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

/// Header carrying an explicit tenant identifier
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Errors that can occur while resolving the tenant context
#[derive(Debug, Error)]
pub enum TenantResolutionError {
    #[error("no tenant context: provide an X-Tenant-Id header or a bearer token")]
    Missing,

    #[error("empty tenant identifier")]
    Empty,

    #[error("tenant header does not match the token's tenant claim")]
    Mismatched,

    #[error("invalid bearer token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Identifier of an isolated agency account.
///
/// Every read and write downstream of the resolver is constructed with
/// this identifier as a mandatory filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Claims we read out of a bearer token
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(rename = "tenantId")]
    tenant_id: String,
    #[allow(dead_code)]
    sub: Option<String>,
    #[allow(dead_code)]
    exp: usize,
}

/// Resolve exactly one tenant identifier for a request
///
/// Sources, in order of preference:
/// 1. The explicit `X-Tenant-Id` header
/// 2. The `tenantId` claim of an `Authorization: Bearer` token
///
/// When both are present they must agree. The resolver performs no data
/// access; existence of the tenant is checked by the storage layer.
pub fn resolve_tenant(
    req: &HttpRequest,
    jwt_secret: &str,
) -> Result<TenantId, TenantResolutionError> {
    let header_tenant = match req.headers().get(TENANT_HEADER) {
        Some(value) => {
            let raw = value.to_str().map_err(|_| TenantResolutionError::Empty)?.trim();
            if raw.is_empty() {
                return Err(TenantResolutionError::Empty);
            }
            Some(raw.to_string())
        }
        None => None,
    };

    let claim_tenant = match bearer_token(req) {
        Some(token) => Some(decode_tenant_claim(token, jwt_secret)?),
        None => None,
    };

    match (header_tenant, claim_tenant) {
        (Some(header), Some(claim)) if header != claim => {
            Err(TenantResolutionError::Mismatched)
        }
        (Some(header), _) => Ok(TenantId(header)),
        (None, Some(claim)) => Ok(TenantId(claim)),
        (None, None) => Err(TenantResolutionError::Missing),
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn decode_tenant_claim(token: &str, jwt_secret: &str) -> Result<String, TenantResolutionError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;

    let tenant = data.claims.tenant_id.trim().to_string();
    if tenant.is_empty() {
        return Err(TenantResolutionError::Empty);
    }

    Ok(tenant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &str = "test-secret";

    #[derive(Serialize)]
    struct TestClaims {
        #[serde(rename = "tenantId")]
        tenant_id: String,
        sub: String,
        exp: usize,
    }

    fn make_token(tenant_id: &str) -> String {
        let claims = TestClaims {
            tenant_id: tenant_id.to_string(),
            sub: "user-1".to_string(),
            exp: 4102444800, // 2100-01-01
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_from_header() {
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, "tenant-a"))
            .to_http_request();

        let tenant = resolve_tenant(&req, SECRET).unwrap();
        assert_eq!(tenant.as_str(), "tenant-a");
    }

    #[test]
    fn test_resolve_from_token_claim() {
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", make_token("tenant-b"))))
            .to_http_request();

        let tenant = resolve_tenant(&req, SECRET).unwrap();
        assert_eq!(tenant.as_str(), "tenant-b");
    }

    #[test]
    fn test_header_and_claim_must_agree() {
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, "tenant-a"))
            .insert_header(("Authorization", format!("Bearer {}", make_token("tenant-b"))))
            .to_http_request();

        assert!(matches!(
            resolve_tenant(&req, SECRET),
            Err(TenantResolutionError::Mismatched)
        ));
    }

    #[test]
    fn test_agreeing_header_and_claim_resolve() {
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, "tenant-a"))
            .insert_header(("Authorization", format!("Bearer {}", make_token("tenant-a"))))
            .to_http_request();

        let tenant = resolve_tenant(&req, SECRET).unwrap();
        assert_eq!(tenant.as_str(), "tenant-a");
    }

    #[test]
    fn test_missing_tenant_context() {
        let req = TestRequest::default().to_http_request();

        assert!(matches!(
            resolve_tenant(&req, SECRET),
            Err(TenantResolutionError::Missing)
        ));
    }

    #[test]
    fn test_empty_header_rejected() {
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, "  "))
            .to_http_request();

        assert!(matches!(
            resolve_tenant(&req, SECRET),
            Err(TenantResolutionError::Empty)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_http_request();

        assert!(matches!(
            resolve_tenant(&req, SECRET),
            Err(TenantResolutionError::Token(_))
        ));
    }
}
