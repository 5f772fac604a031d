// Core algorithm exports
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use matcher::{MatchOutcome, Matcher};
pub use normalize::{currencies_match, destinations_match, normalize_destination};
pub use scoring::{budget_fits, calculate_match_score, dates_overlap, duration_fits};
