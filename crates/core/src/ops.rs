//! Facade operations: one call per user-visible verb
//!
//! Each operation re-resolves its path from scratch; node ids are owned
//! by the remote store and never cached across calls.

use std::path::Path;

use crate::error::{Error, Result};
use crate::path::DrivePath;
use crate::resolve::resolve;
use crate::retry::RetryPolicy;
use crate::store::{DriveStore, NodeId};
use crate::transfer::{TransferObserver, run_download, run_upload};

/// Create a folder at `path`. The parent must already exist.
pub async fn make_directory<S>(store: &S, path: &str) -> Result<NodeId>
where
    S: DriveStore + ?Sized,
{
    let path = DrivePath::parse(path)?;
    let (parent, leaf) = path
        .split_leaf()
        .ok_or_else(|| Error::InvalidPath("the root folder already exists".into()))?;

    let parent_id = resolve(store, &parent).await?;
    let id = store.create_node(&parent_id, leaf, true).await?;
    tracing::info!(%path, %id, "created folder");
    Ok(id)
}

/// Delete the file or folder (and children) at `path`
pub async fn delete<S>(store: &S, path: &str) -> Result<()>
where
    S: DriveStore + ?Sized,
{
    let path = DrivePath::parse(path)?;
    let id = resolve(store, &path).await?;
    store.delete_node(&id).await?;
    tracing::info!(%path, %id, "deleted node");
    Ok(())
}

/// Upload the local file `source` to the remote path `dest`.
///
/// The destination's parent folder must exist; the transfer runs in one
/// resumable session with transient failures retried per `policy`.
pub async fn upload<S>(
    store: &S,
    source: &Path,
    dest: &str,
    policy: &RetryPolicy,
    observer: &mut dyn TransferObserver,
) -> Result<()>
where
    S: DriveStore + ?Sized,
{
    let dest = DrivePath::parse(dest)?;
    let (parent, leaf) = dest
        .split_leaf()
        .ok_or_else(|| Error::InvalidPath("upload destination has no file name".into()))?;

    let parent_id = resolve(store, &parent).await?;
    let mut session = store.open_upload(&parent_id, leaf, source).await?;
    run_upload(session.as_mut(), policy, observer).await
}

/// Download the remote file at `source` to the local path `dest`
pub async fn download<S>(
    store: &S,
    source: &str,
    dest: &Path,
    observer: &mut dyn TransferObserver,
) -> Result<()>
where
    S: DriveStore + ?Sized,
{
    let source = DrivePath::parse(source)?;
    let id = resolve(store, &source).await?;
    let mut session = store.open_download(&id, dest).await?;
    run_download(session.as_mut(), observer).await
}

/// List the names of all children of the folder at `path`, accumulated
/// across every page in the order the service yields them
pub async fn list_files<S>(store: &S, path: &str) -> Result<Vec<String>>
where
    S: DriveStore + ?Sized,
{
    let path = DrivePath::parse(path)?;
    let parent = resolve(store, &path).await?;
    collect_children(store, &parent).await
}

/// Accumulate all children of `parent` by following the page cursor until
/// the service reports no next page
pub async fn collect_children<S>(store: &S, parent: &NodeId) -> Result<Vec<String>>
where
    S: DriveStore + ?Sized,
{
    let mut names = Vec::new();
    let mut cursor = None;

    loop {
        let page = store.list_children(parent, cursor.as_ref()).await?;
        names.extend(page.names);

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(names)
}
