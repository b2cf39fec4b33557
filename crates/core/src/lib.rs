//! dc-core: Core library for the dc Google Drive CLI client
//!
//! This crate provides the backend-agnostic functionality for the dc CLI:
//! - Absolute path handling and segment-wise resolution to node ids
//! - The DriveStore trait abstracting the remote service primitives
//! - The chunked transfer engine with capped-backoff retry for uploads
//! - Facade operations (mkdir, upload, download, delete, list)
//! - Connection profile management
//!
//! This crate is independent of any HTTP stack or service SDK, allowing
//! the remote boundary to be mocked in tests and swapped in principle.

pub mod error;
pub mod ops;
pub mod path;
pub mod profile;
pub mod resolve;
pub mod retry;
pub mod store;
pub mod transfer;

pub use error::{Error, Result};
pub use path::DrivePath;
pub use profile::{Profile, ProfileManager};
pub use resolve::resolve;
pub use retry::RetryPolicy;
pub use store::{
    ChunkStatus, DownloadSession, DriveStore, LookupResult, NodeId, PageCursor, PageResult,
    UploadSession,
};
pub use transfer::{TransferObserver, run_download, run_upload};
