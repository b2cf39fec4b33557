//! The `DriveStore` capability trait and its typed results
//!
//! This is the seam between the backend-agnostic core and the Drive REST
//! adapter. The trait exposes exactly the primitive remote operations the
//! resolver, transfer engine, and paginator need; every operation returns
//! an explicit result struct validated at the adapter boundary, so the
//! callers never handle raw wire data.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque, store-assigned identifier of one node (file or folder).
///
/// Immutable once assigned; no meaning beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

/// Alias the service accepts for the hierarchy root. Resolving it never
/// touches the network.
const ROOT_ALIAS: &str = "root";

impl NodeId {
    /// Wrap a store-assigned identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The well-known root identifier
    pub fn root() -> Self {
        Self(ROOT_ALIAS.to_string())
    }

    /// The raw identifier as the service knows it
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque continuation token for paged listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of a child-name lookup
#[derive(Debug, Clone, Default)]
pub struct LookupResult {
    /// Ids of children matching the requested name, at most `max_results`
    pub ids: Vec<NodeId>,
}

/// One page of a folder listing
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Child names in service order
    pub names: Vec<String>,
    /// Cursor for the next page; `None` on the final page
    pub next_cursor: Option<PageCursor>,
}

/// Outcome of one successful chunk step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkStatus {
    /// Completion fraction in [0.0, 1.0], when the session can compute it
    pub fraction: Option<f64>,
    /// True once the final chunk has been acknowledged
    pub done: bool,
}

impl ChunkStatus {
    pub fn in_progress(fraction: f64) -> Self {
        Self {
            fraction: Some(fraction),
            done: false,
        }
    }

    pub fn finished() -> Self {
        Self {
            fraction: Some(1.0),
            done: true,
        }
    }
}

/// One in-progress upload. The session owns the local source handle and
/// its position; a failed step leaves the position unchanged so the same
/// chunk is retried on the next call.
#[async_trait]
pub trait UploadSession: Send {
    /// Send the next chunk
    async fn step(&mut self) -> Result<ChunkStatus>;
}

/// One in-progress download. The session owns the freshly created local
/// sink; dropping the session closes it on every exit path.
#[async_trait]
pub trait DownloadSession: Send {
    /// Receive the next chunk into the sink
    async fn step(&mut self) -> Result<ChunkStatus>;
}

/// Primitive remote operations against the hierarchical store.
///
/// Implementations construct and dispatch requests; they contain no
/// resolution or retry logic. A handle is reentrant-safe for sequential
/// reuse across calls but makes no guarantee about concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriveStore: Send + Sync {
    /// Children of `parent` whose name equals `name`, capped at
    /// `max_results` entries
    async fn find_child_by_name(
        &self,
        parent: &NodeId,
        name: &str,
        max_results: u32,
    ) -> Result<LookupResult>;

    /// Create a file or folder node under `parent`
    async fn create_node(&self, parent: &NodeId, name: &str, folder: bool) -> Result<NodeId>;

    /// Delete a node (and, for folders, its children) by id
    async fn delete_node(&self, id: &NodeId) -> Result<()>;

    /// Open a resumable upload of the local file `source` as a new node
    /// named `name` under `parent`
    async fn open_upload(
        &self,
        parent: &NodeId,
        name: &str,
        source: &Path,
    ) -> Result<Box<dyn UploadSession>>;

    /// Open a chunked download of `id` into a freshly created local file
    /// at `dest`
    async fn open_download(
        &self,
        id: &NodeId,
        dest: &Path,
    ) -> Result<Box<dyn DownloadSession>>;

    /// One page of the children of `parent`
    async fn list_children<'a>(
        &self,
        parent: &NodeId,
        cursor: Option<&'a PageCursor>,
    ) -> Result<PageResult>;
}
