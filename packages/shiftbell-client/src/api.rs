use async_trait::async_trait;
use shiftbell_core::{Device, Notification, Preferences};
use shiftbell_sdk::{NotifyClient, SdkResult};

/// The backend operations the client subsystem consumes.
///
/// Implemented by [`NotifyClient`] for production and by in-memory mocks in
/// tests, so the store and push pipeline never need a live server.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn list(&self, unread_only: bool) -> SdkResult<Vec<Notification>>;
    async fn unread_count(&self) -> SdkResult<i64>;
    async fn mark_read(&self, id: i64) -> SdkResult<()>;
    async fn mark_all_read(&self) -> SdkResult<()>;
    async fn remove(&self, id: i64) -> SdkResult<()>;
    async fn get_preferences(&self) -> SdkResult<Preferences>;
    async fn update_preferences(&self, prefs: &Preferences) -> SdkResult<Preferences>;
    async fn list_devices(&self) -> SdkResult<Vec<Device>>;
    async fn register_device(&self, token: &str, device_name: Option<&str>) -> SdkResult<Device>;
    async fn remove_device(&self, device_id: i64) -> SdkResult<()>;
    async fn test_push(&self) -> SdkResult<()>;
}

#[async_trait]
impl NotificationApi for NotifyClient {
    async fn list(&self, unread_only: bool) -> SdkResult<Vec<Notification>> {
        self.list_notifications(unread_only).await
    }

    async fn unread_count(&self) -> SdkResult<i64> {
        NotifyClient::unread_count(self).await
    }

    async fn mark_read(&self, id: i64) -> SdkResult<()> {
        NotifyClient::mark_read(self, id).await
    }

    async fn mark_all_read(&self) -> SdkResult<()> {
        NotifyClient::mark_all_read(self).await
    }

    async fn remove(&self, id: i64) -> SdkResult<()> {
        self.remove_notification(id).await
    }

    async fn get_preferences(&self) -> SdkResult<Preferences> {
        NotifyClient::get_preferences(self).await
    }

    async fn update_preferences(&self, prefs: &Preferences) -> SdkResult<Preferences> {
        NotifyClient::update_preferences(self, prefs).await
    }

    async fn list_devices(&self) -> SdkResult<Vec<Device>> {
        NotifyClient::list_devices(self).await
    }

    async fn register_device(&self, token: &str, device_name: Option<&str>) -> SdkResult<Device> {
        NotifyClient::register_device(self, token, device_name).await
    }

    async fn remove_device(&self, device_id: i64) -> SdkResult<()> {
        NotifyClient::remove_device(self, device_id).await
    }

    async fn test_push(&self) -> SdkResult<()> {
        NotifyClient::test_push(self).await
    }
}
