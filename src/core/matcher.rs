use crate::core::normalize::destinations_match;
use crate::core::scoring::calculate_match_score;
use crate::models::{Extraction, MatchResult, Package, PackageStatus, ScoringWeights};

/// Result of one matching run
#[derive(Debug)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Matching engine - scores a tenant's catalog against one extraction
///
/// Pure compute: reads a snapshot of the catalog handed to it, never
/// touches storage. Persisting the outcome is the caller's separate step.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Rank a tenant's packages against an extraction
    ///
    /// Packages not owned by `tenant_id` are dropped even if the storage
    /// layer already filtered; scores and prices are commercially
    /// sensitive per tenant, so the engine re-checks ownership rather
    /// than trusting its input. Inactive packages are dropped for the
    /// same reason.
    ///
    /// When the extraction names a destination, packages elsewhere are
    /// filtered out before scoring: a trip to the wrong place is no
    /// usable match however well it fits the budget or duration. With no
    /// requested destination the filter passes everything through.
    ///
    /// Packages scoring 0 on every remaining criterion are excluded
    /// entirely: a zero score communicates no usable match. The rest
    /// sort by score descending, then price ascending, then package id
    /// ascending - a strict total order, identical across runs for
    /// identical inputs.
    ///
    /// # Arguments
    /// * `tenant_id` - Owning tenant of the extraction's email
    /// * `extraction` - Trip-request attributes (any subset may be present)
    /// * `packages` - Fresh snapshot of the tenant's catalog
    /// * `limit` - Maximum number of results to return
    pub fn rank(
        &self,
        tenant_id: &str,
        extraction: &Extraction,
        packages: Vec<Package>,
        limit: usize,
    ) -> MatchOutcome {
        let total_candidates = packages.len();

        let mut matches: Vec<MatchResult> = packages
            .into_iter()
            .filter(|pkg| pkg.tenant_id == tenant_id)
            .filter(|pkg| pkg.status == PackageStatus::Active)
            .filter(|pkg| matches_requested_destination(pkg, extraction))
            .filter_map(|pkg| {
                let (score, reasons) = calculate_match_score(&pkg, extraction, &self.weights);

                if score == 0 {
                    return None;
                }

                Some(MatchResult {
                    package_id: pkg.id,
                    score,
                    itinerary_title: pkg.title,
                    destination: pkg.destination,
                    price: pkg.price,
                    currency: pkg.currency,
                    duration: pkg.duration_days,
                    match_reasons: reasons,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.price.total_cmp(&b.price))
                .then_with(|| a.package_id.cmp(&b.package_id))
        });

        matches.truncate(limit);

        MatchOutcome {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Hard destination filter, applied before scoring.
///
/// Passes when no destination was extracted (criterion not evaluable)
/// or when the package's destination matches the requested one.
#[inline]
fn matches_requested_destination(package: &Package, extraction: &Extraction) -> bool {
    match extraction.destination.as_deref() {
        Some(wanted) => destinations_match(&package.destination, wanted),
        None => true,
    }
}
