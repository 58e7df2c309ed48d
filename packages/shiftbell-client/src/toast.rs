use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// Ephemeral user-facing messages. One instance per application lifetime,
/// passed to whatever surfaces them.
#[derive(Clone)]
pub struct ToastStore {
    toasts: Arc<Mutex<Vec<Toast>>>,
    next_id: Arc<AtomicU64>,
    ttl: Duration,
}

impl ToastStore {
    pub fn new() -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            ttl: Duration::from_secs(4),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    /// Queue a message and schedule its auto-dismissal.
    pub fn add(&self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.toasts.lock().unwrap().push(Toast {
            id,
            message: message.into(),
            kind,
        });

        let store = self.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            store.dismiss(id);
        });
        id
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.lock().unwrap().retain(|t| t.id != id);
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Info)
    }
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}
