use crate::platform::PlatformError;
use async_trait::async_trait;
use shiftbell_core::{PushPayload, APP_NAME};
use tracing::{debug, warn};
use url::Url;

const DEFAULT_BODY: &str = "You have a new notification";
const DEFAULT_ICON: &str = "/pwa-192x192.png";
const DEFAULT_TARGET: &str = "/notifications";

/// A native system notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Correlation tag; repeated notifications about the same entity replace
    /// rather than stack.
    pub tag: Option<String>,
    /// Deep-link path stored in the notification for click handling.
    pub url: String,
}

/// Native notification display surface of the background context.
#[async_trait]
pub trait NotificationDisplay: Send + Sync {
    async fn show(&self, notification: NativeNotification) -> Result<(), PlatformError>;
}

/// The window clients visible to the background context.
#[async_trait]
pub trait WindowClients: Send + Sync {
    /// URLs of currently open application windows.
    async fn windows(&self) -> Vec<String>;
    async fn navigate_and_focus(&self, window: &str, target: &str) -> Result<(), PlatformError>;
    async fn open_window(&self, target: &str) -> Result<(), PlatformError>;
}

/// Background push handling, running in a worker context that shares no
/// memory with the foreground store. It talks only to the platform's display
/// and window-client APIs.
pub struct BackgroundWorker {
    origin: Url,
    display: Box<dyn NotificationDisplay>,
    clients: Box<dyn WindowClients>,
}

impl BackgroundWorker {
    pub fn new(
        origin: Url,
        display: Box<dyn NotificationDisplay>,
        clients: Box<dyn WindowClients>,
    ) -> Self {
        Self {
            origin,
            display,
            clients,
        }
    }

    /// Build the native notification for a background-delivered payload.
    /// Every field has a fallback so a bare payload still displays something
    /// sensible.
    pub fn build_notification(payload: &PushPayload) -> NativeNotification {
        let title = payload
            .notification
            .as_ref()
            .and_then(|n| n.title.clone())
            .unwrap_or_else(|| APP_NAME.to_string());
        let body = payload
            .notification
            .as_ref()
            .and_then(|n| n.body.clone())
            .unwrap_or_else(|| DEFAULT_BODY.to_string());
        let tag = payload.data_str("shift_id").map(|id| format!("shift-{}", id));
        let url = payload
            .data_str("url")
            .unwrap_or(DEFAULT_TARGET)
            .to_string();

        NativeNotification {
            title,
            body,
            icon: DEFAULT_ICON.to_string(),
            tag,
            url,
        }
    }

    /// Display a background-delivered payload. Display failures are cosmetic
    /// and swallowed.
    pub async fn handle_push(&self, payload: &PushPayload) {
        let notification = Self::build_notification(payload);
        debug!(title = %notification.title, "background push message");
        if let Err(e) = self.display.show(notification).await {
            warn!(error = %e, "native notification display failed");
        }
    }

    /// On click: focus and navigate an already-open same-origin window, or
    /// open a new one at the deep-link target.
    pub async fn handle_click(&self, notification: &NativeNotification) {
        let target = match self.origin.join(&notification.url) {
            Ok(url) => url.to_string(),
            Err(_) => self.origin.to_string(),
        };
        let origin = self.origin.as_str().trim_end_matches('/');

        for window in self.clients.windows().await {
            if window.starts_with(origin) {
                if let Err(e) = self.clients.navigate_and_focus(&window, &target).await {
                    warn!(error = %e, "window focus failed");
                }
                return;
            }
        }
        if let Err(e) = self.clients.open_window(&target).await {
            warn!(error = %e, "window open failed");
        }
    }
}
