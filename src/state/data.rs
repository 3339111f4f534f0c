/// Shared data structures for the application state
///
/// These structs represent the wire model that flows between
/// the record service and the UI layer.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Server-assigned record identity
pub type RecordId = i64;

/// A star rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Every selectable rating, lowest first
    pub const ALL: [Rating; 5] = [Rating(1), Rating(2), Rating(3), Rating(4), Rating(5)];

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating must be between 1 and 5, got {value}"))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    /// Rendered as it appears in the rating picker, e.g. "3 ★★★"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, "★".repeat(self.0 as usize))
    }
}

/// A travel journal entry as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRecord {
    pub id: RecordId,
    pub title: String,
    pub country: String,
    pub city: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// ISO timestamp, e.g. "2024-05-01T00:00:00"
    pub visit_date: String,
    pub rating: Rating,
    pub category: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Set by the service once a photo has been uploaded
    #[serde(default)]
    pub image_filename: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating a record; the service assigns id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelRecordCreate {
    pub title: String,
    pub country: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub visit_date: String,
    pub rating: Rating,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update payload
///
/// Omitted fields are left untouched by the service. For the optional
/// columns, `Some(None)` serializes to `null` and clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TravelRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl TravelRecordUpdate {
    /// True when the update would not change anything
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Paged envelope returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRecordList {
    pub records: Vec<TravelRecord>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

/// Response of the photo upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageUpload {
    pub message: String,
    pub filename: String,
}

/// Journal-wide statistics computed by the service
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AggregateStats {
    pub average_rating_by_country: BTreeMap<String, f64>,
    /// Keyed by "YYYY-MM"
    pub top_destinations_by_month: BTreeMap<String, String>,
    pub category_distribution: BTreeMap<String, u64>,
    pub total_countries_visited: u64,
    pub total_cities_visited: u64,
}

#[cfg(test)]
pub(crate) fn sample_record(id: RecordId) -> TravelRecord {
    TravelRecord {
        id,
        title: "Sunset".to_string(),
        country: "Greece".to_string(),
        city: "Santorini".to_string(),
        latitude: Some(36.3932),
        longitude: Some(25.4615),
        visit_date: "2024-05-01T00:00:00".to_string(),
        rating: Rating(4),
        category: "beach".to_string(),
        notes: Some("Best sunset ever".to_string()),
        image_filename: None,
        created_at: "2024-05-02T10:00:00".to_string(),
        updated_at: "2024-05-02T10:00:00".to_string(),
    }
}
