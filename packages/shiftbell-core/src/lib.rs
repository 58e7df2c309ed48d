use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Application name, used as the fallback title for native notifications.
pub const APP_NAME: &str = "Shiftbell";

fn default_notification_type() -> String {
    "general".to_string()
}

/// One user-facing alert.
///
/// Server-issued records carry the backend's id; notifications synthesized
/// from a push payload use the current epoch-millisecond timestamp as a
/// provisional id until the next list fetch replaces them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_notification_type")]
    pub notification_type: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// Extra fields the backend attaches (e.g. shift_id), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The display portion of an incoming push message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushNote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Raw platform push payload, foreground or background.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub notification: Option<PushNote>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl PushPayload {
    pub fn title_or_default(&self) -> String {
        self.notification
            .as_ref()
            .and_then(|n| n.title.clone())
            .unwrap_or_else(|| "New notification".to_string())
    }

    pub fn body_or_default(&self) -> String {
        self.notification
            .as_ref()
            .and_then(|n| n.body.clone())
            .unwrap_or_default()
    }

    /// String value from the data map, if present.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn notification_type(&self) -> String {
        self.data_str("notification_type")
            .map(str::to_string)
            .unwrap_or_else(default_notification_type)
    }

    /// Synthesize a local notification record from this payload.
    pub fn to_notification(&self, id: i64, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            title: self.title_or_default(),
            body: self.body_or_default(),
            notification_type: self.notification_type(),
            is_read: false,
            created_at,
            extra: self.data.clone(),
        }
    }
}

/// One push-capable client registration known to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub token: String,
    pub device_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body for the device registration endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDevice {
    pub token: String,
    pub device_name: Option<String>,
}

/// Response wrapper for the unread-count endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unread_count: i64,
}

/// Server-owned notification preferences, treated as an opaque document:
/// fetched, edited, and submitted whole.
pub type Preferences = Value;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: String,
    pub timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    /// VAPID public key for push token issuance. Empty means push is not
    /// configured and the push pipeline degrades to a no-op.
    pub vapid_key: String,
}

impl AppConfig {
    pub fn push_configured(&self) -> bool {
        !self.vapid_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3000".to_string(),
            timeout_seconds: 30,
            poll_interval_seconds: 30,
            vapid_key: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_notification_deserialize_with_extra_fields() {
        let json = r#"{
            "id": 7,
            "title": "Shift starts soon",
            "body": "Your shift starts in 15 minutes",
            "notification_type": "shift-reminder",
            "is_read": false,
            "created_at": "2024-05-01T08:00:00Z",
            "shift_id": 42
        }"#;

        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.id, 7);
        assert_eq!(n.notification_type, "shift-reminder");
        assert_eq!(n.extra.get("shift_id"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn test_notification_defaults() {
        let json = r#"{"id": 1, "title": "Hi", "created_at": "2024-05-01T08:00:00Z"}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.body, "");
        assert_eq!(n.notification_type, "general");
        assert!(!n.is_read);
    }

    #[test]
    fn test_push_payload_fallbacks() {
        let payload = PushPayload::default();
        assert_eq!(payload.title_or_default(), "New notification");
        assert_eq!(payload.body_or_default(), "");
        assert_eq!(payload.notification_type(), "general");
        assert!(payload.data_str("url").is_none());
    }

    #[test]
    fn test_push_payload_to_notification() {
        let json = r#"{
            "notification": {"title": "Shift reminder", "body": "Starts at 9"},
            "data": {"notification_type": "shift-reminder", "shift_id": "42"}
        }"#;
        let payload: PushPayload = serde_json::from_str(json).unwrap();

        let now = Utc::now();
        let n = payload.to_notification(1234, now);
        assert_eq!(n.id, 1234);
        assert_eq!(n.title, "Shift reminder");
        assert_eq!(n.notification_type, "shift-reminder");
        assert!(!n.is_read);
        assert_eq!(n.created_at, now);
        assert_eq!(n.extra.get("shift_id"), Some(&serde_json::json!("42")));
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.server_url, "http://127.0.0.1:3000");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.poll_interval_seconds, 30);
        assert!(!config.push_configured());
    }
}
