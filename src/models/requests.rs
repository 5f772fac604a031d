use serde::{Deserialize, Serialize};
use validator::Validate;

/// Optional body for the match-trigger endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchEmailRequest {
    /// Maximum number of results to return; capped by `matching.max_limit`.
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<u16>,
}
