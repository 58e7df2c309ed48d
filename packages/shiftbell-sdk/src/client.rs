use crate::error::{SdkError, SdkResult};
use reqwest::{Client, Method, RequestBuilder, Response};
use shiftbell_core::{Device, Notification, Preferences, RegisterDevice, UnreadCount};
use std::time::Duration;

/// Thin async wrapper around the notification REST API.
///
/// All methods return [`SdkResult`]; the caller decides whether a failure is
/// fatal (CLI) or logged and absorbed (the notification store).
#[derive(Clone)]
pub struct NotifyClient {
    client: Client,
    pub base_url: String,
    pub timeout: Duration,
    pub token: Option<String>,
}

impl NotifyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        let mut request = self.client.request(method, &url).timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    fn check(response: Response) -> SdkResult<Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(SdkError::Status {
                code: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn send_json<T>(request: RequestBuilder) -> SdkResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = Self::check(request.send().await?)?;
        Ok(response.json().await?)
    }

    async fn send_empty(request: RequestBuilder) -> SdkResult<()> {
        Self::check(request.send().await?)?;
        Ok(())
    }

    /// List notifications for the current user.
    pub async fn list_notifications(&self, unread_only: bool) -> SdkResult<Vec<Notification>> {
        let mut request = self.request(Method::GET, "/notifications");
        if unread_only {
            request = request.query(&[("unread_only", "true")]);
        }
        Self::send_json(request).await
    }

    /// Authoritative unread notification count.
    pub async fn unread_count(&self) -> SdkResult<i64> {
        let count: UnreadCount =
            Self::send_json(self.request(Method::GET, "/notifications/unread-count")).await?;
        Ok(count.unread_count)
    }

    pub async fn get_notification(&self, id: i64) -> SdkResult<Notification> {
        Self::send_json(self.request(Method::GET, &format!("/notifications/{}", id))).await
    }

    pub async fn mark_read(&self, id: i64) -> SdkResult<()> {
        Self::send_empty(self.request(Method::PATCH, &format!("/notifications/{}/read", id))).await
    }

    pub async fn mark_all_read(&self) -> SdkResult<()> {
        Self::send_empty(self.request(Method::POST, "/notifications/mark-all-read")).await
    }

    pub async fn remove_notification(&self, id: i64) -> SdkResult<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("/notifications/{}", id))).await
    }

    pub async fn get_preferences(&self) -> SdkResult<Preferences> {
        Self::send_json(self.request(Method::GET, "/notifications/preferences/me")).await
    }

    /// Submit the whole preferences document; returns the stored version.
    pub async fn update_preferences(&self, prefs: &Preferences) -> SdkResult<Preferences> {
        Self::send_json(
            self.request(Method::PUT, "/notifications/preferences/me")
                .json(prefs),
        )
        .await
    }

    /// List push device registrations for the current user.
    pub async fn list_devices(&self) -> SdkResult<Vec<Device>> {
        Self::send_json(self.request(Method::GET, "/notifications/devices/me")).await
    }

    /// Register a push token, tagged with a best-effort device label.
    pub async fn register_device(
        &self,
        token: &str,
        device_name: Option<&str>,
    ) -> SdkResult<Device> {
        let body = RegisterDevice {
            token: token.to_string(),
            device_name: device_name.map(str::to_string),
        };
        Self::send_json(self.request(Method::POST, "/notifications/devices").json(&body)).await
    }

    pub async fn remove_device(&self, device_id: i64) -> SdkResult<()> {
        Self::send_empty(
            self.request(Method::DELETE, &format!("/notifications/devices/{}", device_id)),
        )
        .await
    }

    /// Ask the backend to push a test notification to the current user.
    pub async fn test_push(&self) -> SdkResult<()> {
        Self::send_empty(self.request(Method::POST, "/notifications/test-push")).await
    }
}
