use crate::api::NotificationApi;
use chrono::Utc;
use shiftbell_core::{Notification, Preferences, PushPayload};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Default)]
struct StoreState {
    notifications: Vec<Notification>,
    unread_count: i64,
    preferences: Option<Preferences>,
    loading: bool,
    saving: bool,
}

/// Client-side view of the user's notifications.
///
/// Constructed once per authenticated session and reset at teardown. Three
/// input sources feed it: REST fetches, push payloads, and user actions.
/// Mutations apply optimistically, then the server is called, then the unread
/// counter is re-fetched as source of truth; transient drift between the local
/// heuristic count and server truth is accepted and self-heals on the next
/// count fetch.
#[derive(Clone)]
pub struct NotificationStore {
    api: Arc<dyn NotificationApi>,
    state: Arc<Mutex<StoreState>>,
    poll: Arc<tokio::sync::Mutex<Option<JoinHandle<()>>>>,
    poll_interval: Duration,
}

impl NotificationStore {
    pub fn new(api: Arc<dyn NotificationApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(StoreState::default())),
            poll: Arc::new(tokio::sync::Mutex::new(None)),
            poll_interval: Duration::from_secs(30),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn unread_count(&self) -> i64 {
        self.state.lock().unwrap().unread_count
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count() > 0
    }

    pub fn preferences(&self) -> Option<Preferences> {
        self.state.lock().unwrap().preferences.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    pub fn is_saving(&self) -> bool {
        self.state.lock().unwrap().saving
    }

    /// Replace the local list with the server's current set.
    pub async fn fetch_notifications(&self, unread_only: bool) {
        self.state.lock().unwrap().loading = true;
        match self.api.list(unread_only).await {
            Ok(notifications) => {
                self.state.lock().unwrap().notifications = notifications;
            }
            Err(e) => warn!(error = %e, "notification list fetch failed"),
        }
        self.state.lock().unwrap().loading = false;
    }

    /// Replace the unread counter with the server's authoritative value.
    pub async fn fetch_unread_count(&self) {
        match self.api.unread_count().await {
            Ok(count) => {
                self.state.lock().unwrap().unread_count = count;
            }
            Err(e) => warn!(error = %e, "unread count fetch failed"),
        }
    }

    /// Mark one notification read: optimistic local mutation, then the server
    /// call, then counter reconciliation. The local mutation is never rolled
    /// back on failure.
    pub async fn mark_read(&self, id: i64) {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
                n.is_read = true;
            }
            state.unread_count = (state.unread_count - 1).max(0);
        }
        match self.api.mark_read(id).await {
            Ok(()) => self.fetch_unread_count().await,
            Err(e) => warn!(error = %e, id, "mark read failed"),
        }
    }

    /// Mark everything read. Local state is zeroed regardless of the server
    /// call's outcome.
    pub async fn mark_all_read(&self) {
        {
            let mut state = self.state.lock().unwrap();
            for n in state.notifications.iter_mut() {
                n.is_read = true;
            }
            state.unread_count = 0;
        }
        match self.api.mark_all_read().await {
            Ok(()) => self.fetch_unread_count().await,
            Err(e) => warn!(error = %e, "mark all read failed"),
        }
    }

    /// Delete a notification on the server, then locally.
    pub async fn remove(&self, id: i64) {
        match self.api.remove(id).await {
            Ok(()) => {
                {
                    let mut state = self.state.lock().unwrap();
                    if let Some(idx) = state.notifications.iter().position(|n| n.id == id) {
                        if !state.notifications[idx].is_read {
                            state.unread_count = (state.unread_count - 1).max(0);
                        }
                        state.notifications.remove(idx);
                    }
                }
                self.fetch_unread_count().await;
            }
            Err(e) => warn!(error = %e, id, "notification delete failed"),
        }
    }

    pub async fn fetch_preferences(&self) {
        match self.api.get_preferences().await {
            Ok(prefs) => {
                self.state.lock().unwrap().preferences = Some(prefs);
            }
            Err(e) => warn!(error = %e, "preferences fetch failed"),
        }
    }

    pub async fn update_preferences(&self, prefs: &Preferences) {
        self.state.lock().unwrap().saving = true;
        match self.api.update_preferences(prefs).await {
            Ok(stored) => {
                self.state.lock().unwrap().preferences = Some(stored);
            }
            Err(e) => warn!(error = %e, "preferences update failed"),
        }
        self.state.lock().unwrap().saving = false;
    }

    /// Ingest a foreground push payload: synthesize a local record with a
    /// timestamp id, prepend it, and bump the counter. Local-only, cannot
    /// fail. Returns the synthesized id.
    pub fn ingest_push(&self, payload: &PushPayload) -> i64 {
        let now = Utc::now();
        let id = now.timestamp_millis();
        let notification = payload.to_notification(id, now);

        let mut state = self.state.lock().unwrap();
        state.notifications.insert(0, notification);
        state.unread_count += 1;
        id
    }

    /// Arm the unread-count poller. Idempotent; the first fetch fires
    /// immediately so the UI is not stale until the first tick.
    pub async fn start_polling(&self) {
        let mut guard = self.poll.lock().await;
        if guard.is_some() {
            return;
        }
        self.fetch_unread_count().await;

        let store = self.clone();
        let period = self.poll_interval;
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                ticker.tick().await;
                store.fetch_unread_count().await;
            }
        }));
    }

    /// Disarm the poller. Safe to call when never armed.
    pub async fn stop_polling(&self) {
        if let Some(handle) = self.poll.lock().await.take() {
            handle.abort();
        }
    }

    /// Session teardown: stop timers and drop all state so nothing leaks into
    /// the next session.
    pub async fn reset(&self) {
        self.stop_polling().await;
        *self.state.lock().unwrap() = StoreState::default();
    }
}
