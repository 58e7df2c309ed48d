use crate::api::NotificationApi;
use crate::platform::{Permission, PushPlatform};
use crate::store::NotificationStore;
use crate::toast::ToastStore;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Length the user-agent fallback label is truncated to.
const DEVICE_LABEL_MAX: usize = 40;

#[derive(Default)]
struct PushState {
    permission_granted: bool,
    token: Option<String>,
}

/// Acquires a push token, registers it with the backend, and feeds
/// foreground-delivered payloads into the store.
///
/// Push is strictly best-effort: every failure here is logged and absorbed so
/// it can never block application startup or interrupt the user's workflow.
pub struct PushManager {
    platform: Arc<dyn PushPlatform>,
    api: Arc<dyn NotificationApi>,
    store: NotificationStore,
    toast: ToastStore,
    vapid_key: String,
    state: Arc<Mutex<PushState>>,
    listener: Arc<tokio::sync::Mutex<Option<JoinHandle<()>>>>,
}

impl PushManager {
    pub fn new(
        platform: Arc<dyn PushPlatform>,
        api: Arc<dyn NotificationApi>,
        store: NotificationStore,
        toast: ToastStore,
        vapid_key: &str,
    ) -> Self {
        Self {
            platform,
            api,
            store,
            toast,
            vapid_key: vapid_key.to_string(),
            state: Arc::new(Mutex::new(PushState::default())),
            listener: Arc::new(tokio::sync::Mutex::new(None)),
        }
    }

    /// Push is usable only when the messaging backend is configured and the
    /// runtime has a background worker plus permission prompts. When false,
    /// every other operation is a harmless no-op.
    pub fn push_supported(&self) -> bool {
        !self.vapid_key.is_empty() && self.platform.supported()
    }

    pub fn permission_granted(&self) -> bool {
        self.state.lock().unwrap().permission_granted
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    /// Passive initialization, safe to call at application start. Never
    /// prompts: it only proceeds when permission was already granted.
    pub async fn init_push(&self) {
        if !self.push_supported() {
            info!("push not supported or messaging not configured");
            return;
        }
        if self.platform.permission() != Permission::Granted {
            return;
        }
        self.state.lock().unwrap().permission_granted = true;

        if let Err(e) = self.acquire_and_register().await {
            warn!(error = %e, "push init failed");
        }
    }

    /// Gesture-bound initialization for an "enable notifications" control.
    /// Prompts for permission, then completes the passive flow when granted.
    pub async fn request_permission_and_init(&self) {
        if !self.push_supported() {
            info!("push not supported or messaging not configured");
            return;
        }
        match self.platform.request_permission().await {
            Ok(permission) => {
                let granted = permission == Permission::Granted;
                self.state.lock().unwrap().permission_granted = granted;
                if granted {
                    self.init_push().await;
                }
            }
            Err(e) => {
                // State mirrors the platform's reported permission.
                let granted = self.platform.permission() == Permission::Granted;
                self.state.lock().unwrap().permission_granted = granted;
                warn!(error = %e, "permission request failed");
            }
        }
    }

    async fn acquire_and_register(&self) -> Result<(), crate::platform::PlatformError> {
        self.platform.worker_ready().await?;

        if let Some(token) = self.platform.messaging_token(&self.vapid_key).await? {
            self.state.lock().unwrap().token = Some(token.clone());
            let label = self.device_label();
            if let Err(e) = self.api.register_device(&token, Some(&label)).await {
                warn!(error = %e, "device registration failed");
                return Ok(());
            }
            info!("push token registered");
        }

        self.spawn_foreground_listener().await;
        Ok(())
    }

    fn device_label(&self) -> String {
        self.platform.device_label().unwrap_or_else(|| {
            let ua = self.platform.user_agent();
            ua.chars().take(DEVICE_LABEL_MAX).collect()
        })
    }

    /// Drains the platform's foreground payload bus into the store, surfacing
    /// a toast and a best-effort alert sound per message.
    async fn spawn_foreground_listener(&self) {
        let mut guard = self.listener.lock().await;
        if guard.is_some() {
            return;
        }

        let mut rx = self.platform.subscribe_foreground();
        let store = self.store.clone();
        let toast = self.toast.clone();
        let platform = Arc::clone(&self.platform);

        *guard = Some(tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                debug!(title = %payload.title_or_default(), "foreground push message");
                store.ingest_push(&payload);
                toast.info(payload.title_or_default());
                // Sound playback is cosmetic; autoplay failures stay silent.
                let _ = platform.play_alert_sound().await;
            }
        }));
    }

    /// Teardown for logout: stop listening for foreground messages.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.abort();
        }
        *self.state.lock().unwrap() = PushState::default();
    }
}
