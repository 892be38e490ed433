//! Core types for media-gallery

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a media record
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct MediaId(pub i64);

impl MediaId {
    /// Create a new MediaId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for MediaId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<MediaId> for i64 {
    fn from(id: MediaId) -> Self {
        id.0
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MediaId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

// Implement sqlx Type, Encode, and Decode for database operations
impl sqlx::Type<sqlx::Sqlite> for MediaId {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for MediaId {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for MediaId {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(id))
    }
}

/// Kind of stored media
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image (jpg, png, webp, ...)
    Image,
    /// Video clip (mp4, webm, ...)
    Video,
}

impl MediaKind {
    /// The lowercase string stored in the database and used in query params
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Parse a kind from its lowercase string form
    ///
    /// Returns `None` for anything other than "image" or "video".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Fallback archive member extension when the source URL carries none
    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored media record
///
/// Immutable for the duration of one export run; owned by the database
/// layer and read-only to the export orchestrator.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaRecord {
    /// Unique database ID
    pub id: MediaId,
    /// Remote URL of the backing object in the storage provider
    pub url: String,
    /// Storage provider key (e.g. Cloudinary public ID), used to derive
    /// archive member names
    pub storage_key: String,
    /// Media kind
    pub kind: MediaKind,
    /// User-supplied caption (may be empty)
    pub caption: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// A media record to be registered
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct NewMediaRecord {
    /// Remote URL of the stored object
    pub url: String,
    /// Storage provider key
    pub storage_key: String,
    /// Media kind
    pub kind: MediaKind,
    /// Optional caption
    #[serde(default)]
    pub caption: String,
}

/// One skipped record in an export run
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct FailedItem {
    /// The record that failed
    pub id: MediaId,
    /// Why it was skipped
    pub reason: String,
}

/// Summary of one export run
///
/// Accumulated by the orchestrator across the run. The final value is the
/// authoritative summary, logged after the stream completes; it is never
/// written to the HTTP body because status and headers were committed before
/// streaming began.
#[derive(Clone, Debug, Default, Serialize, ToSchema)]
pub struct ExportOutcome {
    /// Number of records processed
    pub attempted: usize,
    /// Number of members written to the archive
    pub succeeded: usize,
    /// Skipped records, in submission order
    pub failed: Vec<FailedItem>,
}

impl ExportOutcome {
    /// Create an empty outcome
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successfully archived member
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    /// Record one skipped record
    pub fn record_failure(&mut self, id: MediaId, reason: impl Into<String>) {
        self.attempted += 1;
        self.failed.push(FailedItem {
            id,
            reason: reason.into(),
        });
    }

    /// Whether every attempted record made it into the archive
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_id_conversions() {
        let id = MediaId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(MediaId::from(42), id);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<MediaId>().unwrap(), id);
    }

    #[test]
    fn media_kind_parse_roundtrip() {
        assert_eq!(MediaKind::parse("image"), Some(MediaKind::Image));
        assert_eq!(MediaKind::parse("video"), Some(MediaKind::Video));
        assert_eq!(MediaKind::parse("audio"), None);
        assert_eq!(MediaKind::parse("Image"), None, "parse is case-sensitive");

        assert_eq!(MediaKind::Image.as_str(), "image");
        assert_eq!(MediaKind::Video.as_str(), "video");
    }

    #[test]
    fn media_kind_serde_lowercase() {
        let json = serde_json::to_string(&MediaKind::Video).unwrap();
        assert_eq!(json, "\"video\"");

        let kind: MediaKind = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(kind, MediaKind::Image);
    }

    #[test]
    fn outcome_arithmetic_invariant() {
        let mut outcome = ExportOutcome::new();
        outcome.record_success();
        outcome.record_failure(MediaId::new(2), "remote returned status 404");
        outcome.record_success();

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(
            outcome.succeeded + outcome.failed.len(),
            outcome.attempted,
            "succeeded + failed must equal attempted"
        );
        assert!(!outcome.is_clean());
        assert_eq!(outcome.failed[0].id, MediaId::new(2));
    }

    #[test]
    fn outcome_failure_order_is_submission_order() {
        let mut outcome = ExportOutcome::new();
        outcome.record_failure(MediaId::new(7), "first");
        outcome.record_failure(MediaId::new(3), "second");

        let ids: Vec<i64> = outcome.failed.iter().map(|f| f.id.get()).collect();
        assert_eq!(ids, vec![7, 3]);
    }
}
