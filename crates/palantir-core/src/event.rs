use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const EVENT_TYPE_PAGEVIEW: &str = "pageview";
pub const EVENT_TYPE_EVENT: &str = "event";

/// A stored beacon. Mirrors the DuckDB `events` table columns exactly.
///
/// Pageviews and custom events share one table and are told apart by
/// `event_type`; `event_name` is only set for custom events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub website_id: String,
    pub event_type: String,
    pub url: String,
    pub referrer: Option<String>,
    pub event_name: Option<String>,
    /// Serialized JSON object with custom properties.
    pub event_data: Option<String>,
    pub visitor_id: String,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub device: Option<String>,
    pub language: Option<String>,
    pub screen_width: Option<i32>,
    /// ISO 3166-1 alpha-2.
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// A bare pageview with a fresh id and no enrichment fields.
    pub fn pageview(
        website_id: &str,
        url: &str,
        visitor_id: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            website_id: website_id.to_string(),
            event_type: EVENT_TYPE_PAGEVIEW.to_string(),
            url: url.to_string(),
            referrer: None,
            event_name: None,
            event_data: None,
            visitor_id: visitor_id.to_string(),
            browser: None,
            os: None,
            device: None,
            language: None,
            screen_width: None,
            country_code: None,
            country_name: None,
            city: None,
            region: None,
            created_at,
        }
    }

    /// A custom event named `event_name`.
    pub fn custom(
        website_id: &str,
        url: &str,
        event_name: &str,
        visitor_id: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: EVENT_TYPE_EVENT.to_string(),
            event_name: Some(event_name.to_string()),
            ..Self::pageview(website_id, url, visitor_id, created_at)
        }
    }

    /// Attach custom properties, stored as a JSON string.
    pub fn with_event_data(mut self, data: &serde_json::Value) -> Result<Self, CoreError> {
        self.event_data = Some(serde_json::to_string(data)?);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn custom_event_carries_name_and_type() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let event = Event::custom("site_1", "/pricing", "signup", "v1", at);
        assert_eq!(event.event_type, EVENT_TYPE_EVENT);
        assert_eq!(event.event_name.as_deref(), Some("signup"));
    }

    #[test]
    fn event_data_is_stored_as_json_string() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let event = Event::custom("site_1", "/", "click", "v1", at)
            .with_event_data(&serde_json::json!({ "button": "cta" }))
            .unwrap();
        assert_eq!(event.event_data.as_deref(), Some(r#"{"button":"cta"}"#));
    }
}
