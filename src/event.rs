//! Event model persisted in the events table and served to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// A showcased happening, immutable once created.
///
/// Rows are only ever inserted by the seed/ingest admin path and read by the
/// HTTP surface; there is no update or delete path.
///
/// ```json
/// {
///   "id": "5f7a...",
///   "title": "Cloud Architecture Summit",
///   "description": "Learn about cloud-native architecture...",
///   "eventDate": "2024-03-15T11:00:00Z",
///   "imageUrl": null,
///   "tier": "gold",
///   "createdAt": "2024-01-02T09:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Server-assigned identifier (hyphenated UUID).
    pub id: String,
    /// Non-empty display title.
    pub title: String,
    /// Free-form description body.
    pub description: String,
    /// When the event takes place, timezone-aware.
    pub event_date: DateTime<Utc>,
    /// Optional image reference.
    pub image_url: Option<String>,
    /// Minimum membership tier required to access the event.
    pub tier: Tier,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert shape for the seed/ingest path; `id` and `created_at` are assigned
/// by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub tier: Tier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_camel_case() {
        let event = Event {
            id: "abc".into(),
            title: "Community Meetup".into(),
            description: "Casual meetup".into(),
            event_date: "2024-02-15T18:00:00Z".parse().unwrap(),
            image_url: None,
            tier: Tier::Free,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["eventDate"], "2024-02-15T18:00:00Z");
        assert_eq!(value["imageUrl"], serde_json::Value::Null);
        assert_eq!(value["tier"], "free");
        assert!(value.get("event_date").is_none());
    }

    #[test]
    fn new_event_image_url_defaults_to_none() {
        let ev: NewEvent = serde_json::from_str(
            r#"{
                "title": "Workshop",
                "description": "Hands-on",
                "eventDate": "2024-02-20T14:00:00Z",
                "tier": "silver"
            }"#,
        )
        .unwrap();
        assert!(ev.image_url.is_none());
        assert_eq!(ev.tier, Tier::Silver);
    }
}
