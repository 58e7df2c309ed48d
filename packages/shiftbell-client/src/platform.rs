use async_trait::async_trait;
use shiftbell_core::PushPayload;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
#[error("platform error: {0}")]
pub struct PlatformError(pub String);

/// Current notification permission as reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// Not yet decided; a user-gesture prompt may still resolve it.
    Prompt,
}

/// Host platform facilities the push pipeline depends on.
///
/// Injected rather than referenced ambiently so the pipeline is testable
/// without a real runtime. [`UnsupportedPlatform`] is the degrade-to-harmless
/// variant used when no push-capable runtime exists.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    /// Whether the runtime has a background worker and permission prompts.
    fn supported(&self) -> bool;

    /// Current permission without prompting.
    fn permission(&self) -> Permission;

    /// Prompt the user. Only valid inside a user-gesture handler.
    async fn request_permission(&self) -> Result<Permission, PlatformError>;

    /// Resolves once the background worker is active.
    async fn worker_ready(&self) -> Result<(), PlatformError>;

    /// Messaging token scoped to the active worker, if the push service
    /// issues one.
    async fn messaging_token(&self, vapid_key: &str) -> Result<Option<String>, PlatformError>;

    /// Bus of foreground-delivered push payloads.
    fn subscribe_foreground(&self) -> mpsc::UnboundedReceiver<PushPayload>;

    /// Human-readable device label, if the platform exposes one.
    fn device_label(&self) -> Option<String>;

    /// Raw user-agent string, used as the label fallback.
    fn user_agent(&self) -> String;

    /// Best-effort alert sound; callers swallow failures.
    async fn play_alert_sound(&self) -> Result<(), PlatformError>;
}

/// No-op platform for runtimes without push support.
pub struct UnsupportedPlatform;

#[async_trait]
impl PushPlatform for UnsupportedPlatform {
    fn supported(&self) -> bool {
        false
    }

    fn permission(&self) -> Permission {
        Permission::Denied
    }

    async fn request_permission(&self) -> Result<Permission, PlatformError> {
        Ok(Permission::Denied)
    }

    async fn worker_ready(&self) -> Result<(), PlatformError> {
        Err(PlatformError("no background worker".to_string()))
    }

    async fn messaging_token(&self, _vapid_key: &str) -> Result<Option<String>, PlatformError> {
        Ok(None)
    }

    fn subscribe_foreground(&self) -> mpsc::UnboundedReceiver<PushPayload> {
        // Sender is dropped immediately; the receiver just stays empty.
        let (_tx, rx) = mpsc::unbounded_channel();
        rx
    }

    fn device_label(&self) -> Option<String> {
        None
    }

    fn user_agent(&self) -> String {
        "unknown".to_string()
    }

    async fn play_alert_sound(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}
