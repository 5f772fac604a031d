use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Budget parsed out of an inbound email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub amount: f64,
    pub currency: String,
}

/// Structured trip-request attributes extracted from one inbound email.
///
/// Produced by the upstream extraction pipeline and immutable afterwards.
/// Real-world emails rarely yield every field, so everything is optional;
/// an absent field makes its criterion non-evaluable rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<Budget>,
    #[serde(default)]
    pub travelers: Option<u32>,
    #[serde(rename = "durationDays", default)]
    pub duration_days: Option<u32>,
}

impl Extraction {
    /// Requested trip length in days: the explicit field when present,
    /// otherwise derived from the date range.
    pub fn effective_duration_days(&self) -> Option<i64> {
        if let Some(days) = self.duration_days {
            return Some(days as i64);
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => {
                Some((end - start).num_days())
            }
            _ => None,
        }
    }
}

/// Publication state of a package; only active packages are matchable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Draft,
    Active,
    Archived,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Draft => "draft",
            PackageStatus::Active => "active",
            PackageStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PackageStatus::Draft),
            "active" => Some(PackageStatus::Active),
            "archived" => Some(PackageStatus::Archived),
            _ => None,
        }
    }
}

/// A sellable travel itinerary owned by exactly one tenant.
/// Read-only to the matching engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    #[serde(rename = "tenantId")]
    pub tenant_id: String,
    pub title: String,
    pub destination: String,
    pub price: f64,
    pub currency: String,
    #[serde(rename = "durationDays")]
    pub duration_days: i32,
    #[serde(default)]
    pub capacity: i32,
    pub status: PackageStatus,
    #[serde(rename = "availableFrom", default)]
    pub available_from: Option<NaiveDate>,
    #[serde(rename = "availableTo", default)]
    pub available_to: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A scored, annotated reference from an extraction to a candidate package.
///
/// Snapshot fields (title, destination, price, currency, duration) are
/// copied at match time so later catalog edits do not rewrite historical
/// match explanations. Lives only as an element of an email's ordered
/// results list, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "packageId")]
    pub package_id: String,
    pub score: u32,
    #[serde(rename = "itineraryTitle")]
    pub itinerary_title: String,
    pub destination: String,
    pub price: f64,
    pub currency: String,
    pub duration: i32,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
}

/// An inbound email record with its extraction and last-saved matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    #[serde(rename = "tenantId")]
    pub tenant_id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(rename = "receivedAt", default)]
    pub received_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub extraction: Option<Extraction>,
    #[serde(rename = "matchResults", default)]
    pub match_results: Vec<MatchResult>,
    #[serde(rename = "matchedAt", default)]
    pub matched_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub destination: u32,
    pub budget: u32,
    pub duration: u32,
    pub dates: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            destination: 50,
            budget: 25,
            duration: 20,
            dates: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_duration_prefers_explicit_field() {
        let extraction = Extraction {
            duration_days: Some(7),
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 3),
            ..Default::default()
        };
        assert_eq!(extraction.effective_duration_days(), Some(7));
    }

    #[test]
    fn test_effective_duration_derived_from_dates() {
        let extraction = Extraction {
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 6),
            ..Default::default()
        };
        assert_eq!(extraction.effective_duration_days(), Some(5));
    }

    #[test]
    fn test_effective_duration_absent() {
        let extraction = Extraction::default();
        assert_eq!(extraction.effective_duration_days(), None);
    }

    #[test]
    fn test_package_status_round_trip() {
        for status in [PackageStatus::Draft, PackageStatus::Active, PackageStatus::Archived] {
            assert_eq!(PackageStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PackageStatus::parse("deleted"), None);
    }

    #[test]
    fn test_match_result_serializes_to_persisted_shape() {
        let result = MatchResult {
            package_id: "pkg-1".to_string(),
            score: 95,
            itinerary_title: "Paris Getaway".to_string(),
            destination: "Paris".to_string(),
            price: 1800.0,
            currency: "USD".to_string(),
            duration: 5,
            match_reasons: vec!["Destination matches".to_string()],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["packageId"], "pkg-1");
        assert_eq!(json["itineraryTitle"], "Paris Getaway");
        assert_eq!(json["matchReasons"][0], "Destination matches");
    }
}
