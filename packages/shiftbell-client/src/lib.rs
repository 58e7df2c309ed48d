//! Shiftbell client library.
//!
//! Holds the notification state store, the unread-count poller, the push
//! registration pipeline, and the background worker context. Platform
//! facilities (permission prompts, token issuance, native notification
//! display) are injected behind traits so everything here runs without a real
//! push runtime.

pub mod api;
pub mod background;
pub mod platform;
pub mod push;
pub mod store;
pub mod toast;

#[cfg(test)]
mod testutil;

pub use api::NotificationApi;
pub use background::{BackgroundWorker, NativeNotification, NotificationDisplay, WindowClients};
pub use platform::{Permission, PlatformError, PushPlatform, UnsupportedPlatform};
pub use push::PushManager;
pub use store::NotificationStore;
pub use toast::{Toast, ToastKind, ToastStore};
