pub mod client;
pub mod error;

pub use client::NotifyClient;
pub use error::{SdkError, SdkResult};
