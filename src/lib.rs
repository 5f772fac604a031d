//! Itinera Match - email-to-itinerary matching service for the Itinera travel CRM
//!
//! This library ranks a tenant's itinerary packages against the structured
//! trip-request attributes extracted from an inbound email, and persists
//! the ranked results back onto the email record. All data access is
//! tenant-scoped; every core function takes the tenant identifier as an
//! explicit parameter.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;
pub mod tenant;

// Re-export commonly used types
pub use core::{Matcher, normalize::{destinations_match, normalize_destination}};
pub use models::{Budget, EmailRecord, Extraction, MatchResult, Package, PackageStatus, ScoringWeights};
pub use tenant::{resolve_tenant, TenantId, TenantResolutionError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        assert!(destinations_match("Paris", "paris, france"));
        assert_eq!(normalize_destination("  ROME "), "rome");
    }
}
