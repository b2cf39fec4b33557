//! dc-drive: Google Drive REST adapter for drivectl
//!
//! Implements the `DriveStore` trait from dc-core over the Drive v3 HTTP
//! API, including service-account authentication with domain-wide
//! delegation, resumable chunked uploads, and ranged chunked downloads.

mod auth;
mod client;
mod download;
mod upload;

pub use auth::{Authenticator, ServiceAccountKey};
pub use client::DriveClient;
