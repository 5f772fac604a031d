// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Budget, EmailRecord, Extraction, MatchResult, Package, PackageStatus, ScoringWeights};
pub use requests::MatchEmailRequest;
pub use responses::{ErrorResponse, HealthResponse, MatchEmailResponse, StoredMatchesResponse};
