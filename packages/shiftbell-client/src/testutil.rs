use crate::api::NotificationApi;
use crate::platform::{Permission, PlatformError, PushPlatform};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Map;
use shiftbell_core::{Device, Notification, Preferences, PushNote, PushPayload};
use shiftbell_sdk::{SdkError, SdkResult};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub(crate) fn sample_notification(id: i64, is_read: bool) -> Notification {
    Notification {
        id,
        title: format!("Notification {}", id),
        body: "body".to_string(),
        notification_type: "general".to_string(),
        is_read,
        created_at: Utc::now(),
        extra: Map::new(),
    }
}

pub(crate) fn push_payload(title: &str, notification_type: &str) -> PushPayload {
    let mut data = Map::new();
    data.insert(
        "notification_type".to_string(),
        serde_json::Value::String(notification_type.to_string()),
    );
    PushPayload {
        notification: Some(PushNote {
            title: Some(title.to_string()),
            body: Some("body".to_string()),
        }),
        data,
    }
}

/// In-memory backend double with per-call counters and a failure switch.
#[derive(Default)]
pub(crate) struct MockApi {
    notifications: Mutex<Vec<Notification>>,
    unread: AtomicI64,
    devices: Mutex<Vec<Device>>,
    next_device_id: AtomicI64,
    /// Calls to `unread_count` specifically.
    pub count_calls: AtomicUsize,
    /// Calls to any endpoint.
    pub total_calls: AtomicUsize,
    pub fail_all: AtomicBool,
}

impl MockApi {
    pub fn seed_notifications(&self, notifications: Vec<Notification>) {
        *self.notifications.lock().unwrap() = notifications;
    }

    pub fn set_unread(&self, count: i64) {
        self.unread.store(count, Ordering::SeqCst);
    }

    fn check(&self) -> SdkResult<()> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst) {
            Err(SdkError::Status { code: 500 })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationApi for MockApi {
    async fn list(&self, unread_only: bool) -> SdkResult<Vec<Notification>> {
        self.check()?;
        let all = self.notifications.lock().unwrap().clone();
        Ok(if unread_only {
            all.into_iter().filter(|n| !n.is_read).collect()
        } else {
            all
        })
    }

    async fn unread_count(&self) -> SdkResult<i64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.unread.load(Ordering::SeqCst))
    }

    async fn mark_read(&self, _id: i64) -> SdkResult<()> {
        self.check()
    }

    async fn mark_all_read(&self) -> SdkResult<()> {
        self.check()
    }

    async fn remove(&self, _id: i64) -> SdkResult<()> {
        self.check()
    }

    async fn get_preferences(&self) -> SdkResult<Preferences> {
        self.check()?;
        Ok(serde_json::json!({"shift_reminders": true}))
    }

    async fn update_preferences(&self, prefs: &Preferences) -> SdkResult<Preferences> {
        self.check()?;
        Ok(prefs.clone())
    }

    async fn list_devices(&self) -> SdkResult<Vec<Device>> {
        self.check()?;
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn register_device(&self, token: &str, device_name: Option<&str>) -> SdkResult<Device> {
        self.check()?;
        let device = Device {
            id: self.next_device_id.fetch_add(1, Ordering::SeqCst) + 1,
            token: token.to_string(),
            device_name: device_name.map(str::to_string),
            created_at: Utc::now(),
        };
        self.devices.lock().unwrap().push(device.clone());
        Ok(device)
    }

    async fn remove_device(&self, device_id: i64) -> SdkResult<()> {
        self.check()?;
        self.devices.lock().unwrap().retain(|d| d.id != device_id);
        Ok(())
    }

    async fn test_push(&self) -> SdkResult<()> {
        self.check()
    }
}

/// Scriptable platform double.
pub(crate) struct MockPlatform {
    pub supported: bool,
    pub permission: Mutex<Permission>,
    pub grant_on_request: bool,
    pub fail_request: bool,
    pub token: Option<String>,
    pub label: Option<String>,
    pub user_agent: String,
    sender: Arc<Mutex<Option<mpsc::UnboundedSender<PushPayload>>>>,
}

impl MockPlatform {
    fn base(supported: bool, permission: Permission, token: &str) -> Self {
        Self {
            supported,
            permission: Mutex::new(permission),
            grant_on_request: true,
            fail_request: false,
            token: Some(token.to_string()),
            label: Some("Mock Browser".to_string()),
            user_agent: "MockAgent/1.0".to_string(),
            sender: Arc::new(Mutex::new(None)),
        }
    }

    pub fn unsupported() -> Self {
        Self::base(false, Permission::Denied, "unused")
    }

    pub fn granted(token: &str) -> Self {
        Self::base(true, Permission::Granted, token)
    }

    pub fn prompt(token: &str) -> Self {
        Self::base(true, Permission::Prompt, token)
    }

    /// Handle for pushing payloads onto the foreground bus after subscribe.
    pub fn sender_handle(&self) -> Arc<Mutex<Option<mpsc::UnboundedSender<PushPayload>>>> {
        Arc::clone(&self.sender)
    }
}

#[async_trait]
impl PushPlatform for MockPlatform {
    fn supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> Result<Permission, PlatformError> {
        if self.fail_request {
            return Err(PlatformError("prompt dismissed".to_string()));
        }
        let decided = if self.grant_on_request {
            Permission::Granted
        } else {
            Permission::Denied
        };
        *self.permission.lock().unwrap() = decided;
        Ok(decided)
    }

    async fn worker_ready(&self) -> Result<(), PlatformError> {
        if self.supported {
            Ok(())
        } else {
            Err(PlatformError("no background worker".to_string()))
        }
    }

    async fn messaging_token(&self, _vapid_key: &str) -> Result<Option<String>, PlatformError> {
        Ok(self.token.clone())
    }

    fn subscribe_foreground(&self) -> mpsc::UnboundedReceiver<PushPayload> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock().unwrap() = Some(tx);
        rx
    }

    fn device_label(&self) -> Option<String> {
        self.label.clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    async fn play_alert_sound(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}
