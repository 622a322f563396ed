// src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

/// Content metadata as stored in the movies collection. Read-only from the
/// client; editing happens in the backend console.
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    #[serde(rename = "$id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "posterUrl")]
    pub poster_url: String,
    #[serde(rename = "streamUrl", default)]
    pub stream_url: Option<String>,
    #[serde(rename = "trailerUrl", default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "releaseYear", default)]
    pub release_year: i32,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Single-title rental price in MNT. 0 means not sold individually.
    #[serde(default)]
    pub price: i64,
    #[serde(rename = "episodeUrls", default)]
    pub episode_urls: Vec<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Subscription bundles. On the wire these live in the purchase record's
/// `movieId` attribute as sentinel strings; the closed set below is the whole
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleTier {
    Premium,
    Series,
    Movies,
    /// Blanket subscription from before the tier split. Still present in old
    /// purchase records, so it must parse; it is no longer sold and confers
    /// no access.
    AllAccess,
}

impl BundleTier {
    pub const fn sentinel(self) -> &'static str {
        match self {
            BundleTier::Premium => "ALL_ACCESS_PREMIUM",
            BundleTier::Series => "ALL_ACCESS_SERIES",
            BundleTier::Movies => "ALL_ACCESS_MOVIES",
            BundleTier::AllAccess => "ALL_ACCESS_SUBSCRIPTION",
        }
    }

    pub fn from_sentinel(raw: &str) -> Option<Self> {
        match raw {
            "ALL_ACCESS_PREMIUM" => Some(BundleTier::Premium),
            "ALL_ACCESS_SERIES" => Some(BundleTier::Series),
            "ALL_ACCESS_MOVIES" => Some(BundleTier::Movies),
            "ALL_ACCESS_SUBSCRIPTION" => Some(BundleTier::AllAccess),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BundleTier::Premium => "Premium All Access",
            BundleTier::Series => "Series All Access",
            BundleTier::Movies => "Movies All Access",
            BundleTier::AllAccess => "All Access",
        }
    }
}

/// What a purchase record points at: one title, or a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseTarget {
    Content(String),
    Bundle(BundleTier),
}

impl PurchaseTarget {
    /// Maps the raw `movieId` attribute. Anything outside the sentinel set is
    /// a literal content id.
    pub fn from_raw(raw: &str) -> Self {
        match BundleTier::from_sentinel(raw) {
            Some(tier) => PurchaseTarget::Bundle(tier),
            None => PurchaseTarget::Content(raw.to_string()),
        }
    }

    pub fn as_raw(&self) -> &str {
        match self {
            PurchaseTarget::Content(id) => id,
            PurchaseTarget::Bundle(tier) => tier.sentinel(),
        }
    }

    pub fn is_bundle(&self) -> bool {
        matches!(self, PurchaseTarget::Bundle(_))
    }
}

impl Serialize for PurchaseTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_raw())
    }
}

impl<'de> Deserialize<'de> for PurchaseTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PurchaseTarget::from_raw(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseStatus {
    Paid,
    Other(String),
}

impl PurchaseStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, PurchaseStatus::Paid)
    }
}

impl Serialize for PurchaseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PurchaseStatus::Paid => serializer.serialize_str("PAID"),
            PurchaseStatus::Other(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for PurchaseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "PAID" => PurchaseStatus::Paid,
            _ => PurchaseStatus::Other(raw),
        })
    }
}

/// A grant record. Created by the payment function, flipped to PAID by the
/// backend when the gateway confirms payment; the client only ever reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct Purchase {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "movieId")]
    pub target: PurchaseTarget,
    pub status: PurchaseStatus,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

/// Per-search-term counter with a denormalized snapshot of the top match.
/// Attribute casing follows the deployed collection schema.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchMetric {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub movie_id: String,
    pub title: String,
    pub poster_url: String,
    pub count: i64,
}

/// Aggregated trending entry: one row per movie, counts summed across all
/// search terms that resolved to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingMovie {
    pub movie_id: String,
    pub title: String,
    pub poster_url: String,
    pub total_count: i64,
}

/// A purchased title with its access window, for the "My Movies" screen.
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub movie: Movie,
    pub expires_at: DateTime<Utc>,
}

/// The signed-in account as the auth service reports it. The email is the
/// synthetic one derived from the phone number at registration.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Subscription terms offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDuration {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl PlanDuration {
    pub const fn days(self) -> i64 {
        match self {
            PlanDuration::OneMonth => 30,
            PlanDuration::ThreeMonths => 90,
            PlanDuration::SixMonths => 180,
            PlanDuration::OneYear => 365,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PlanDuration::OneMonth => "1 month",
            PlanDuration::ThreeMonths => "3 months",
            PlanDuration::SixMonths => "6 months",
            PlanDuration::OneYear => "12 months",
        }
    }
}
