//! Path resolution: absolute path → node id
//!
//! Walks the hierarchy from the well-known root, one segment at a time,
//! looking each name up under the current folder. Every segment must match
//! exactly one child: zero matches and multiple matches are distinct error
//! conditions, never silently resolved by picking a winner.
//!
//! The resolver performs no retries of its own. A lookup failure here is
//! structural, not network flakiness, and surfaces directly to the caller.

use crate::error::{Error, Result};
use crate::path::DrivePath;
use crate::store::{DriveStore, NodeId};

/// Two results are enough to tell "exactly one" from "more than one"
/// without over-fetching.
const LOOKUP_PAGE_SIZE: u32 = 2;

/// Resolve an absolute path to the id of the node it names.
///
/// The root path resolves to [`NodeId::root`] without any network call;
/// a path with N segments performs exactly N lookups, left to right.
pub async fn resolve<S>(store: &S, path: &DrivePath) -> Result<NodeId>
where
    S: DriveStore + ?Sized,
{
    let mut current = NodeId::root();

    for segment in path.segments() {
        let lookup = store
            .find_child_by_name(&current, segment, LOOKUP_PAGE_SIZE)
            .await?;

        current = match lookup.ids.as_slice() {
            [] => {
                return Err(Error::NotFound {
                    name: segment.clone(),
                    parent: current,
                });
            }
            [id] => {
                tracing::debug!(segment = %segment, id = %id, "resolved path segment");
                id.clone()
            }
            many => {
                return Err(Error::Ambiguous {
                    name: segment.clone(),
                    parent: current,
                    count: many.len(),
                });
            }
        };
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LookupResult, MockDriveStore};

    fn lookup_of(ids: &[&str]) -> LookupResult {
        LookupResult {
            ids: ids.iter().copied().map(NodeId::new).collect(),
        }
    }

    #[tokio::test]
    async fn test_resolves_unique_chain_one_lookup_per_segment() {
        let mut store = MockDriveStore::new();

        store
            .expect_find_child_by_name()
            .withf(|parent, name, max| {
                *parent == NodeId::root() && name == "docs" && *max == 2
            })
            .times(1)
            .returning(|_, _, _| Ok(lookup_of(&["id-docs"])));

        store
            .expect_find_child_by_name()
            .withf(|parent, name, max| {
                *parent == NodeId::new("id-docs") && name == "report.txt" && *max == 2
            })
            .times(1)
            .returning(|_, _, _| Ok(lookup_of(&["id-report"])));

        let path = DrivePath::parse("/docs/report.txt").unwrap();
        let id = resolve(&store, &path).await.unwrap();
        assert_eq!(id, NodeId::new("id-report"));
    }

    #[tokio::test]
    async fn test_root_resolves_without_network() {
        let store = MockDriveStore::new();

        let id = resolve(&store, &DrivePath::root()).await.unwrap();
        assert_eq!(id, NodeId::root());
    }

    #[tokio::test]
    async fn test_missing_segment_stops_the_walk() {
        let mut store = MockDriveStore::new();

        // Only the first segment is ever looked up.
        store
            .expect_find_child_by_name()
            .withf(|_, name, _| name == "ghost")
            .times(1)
            .returning(|_, _, _| Ok(LookupResult::default()));

        let path = DrivePath::parse("/ghost/deeper/still").unwrap();
        let err = resolve(&store, &path).await.unwrap_err();

        match err {
            Error::NotFound { name, parent } => {
                assert_eq!(name, "ghost");
                assert_eq!(parent, NodeId::root());
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_names_are_ambiguous() {
        let mut store = MockDriveStore::new();

        store
            .expect_find_child_by_name()
            .times(1)
            .returning(|_, _, _| Ok(lookup_of(&["id-1", "id-2"])));

        let path = DrivePath::parse("/twin").unwrap();
        let err = resolve(&store, &path).await.unwrap_err();

        match err {
            Error::Ambiguous { name, count, .. } => {
                assert_eq!(name, "twin");
                assert_eq!(count, 2);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_errors_propagate_unretried() {
        let mut store = MockDriveStore::new();

        store
            .expect_find_child_by_name()
            .times(1)
            .returning(|_, _, _| {
                Err(Error::from_status(503, "backend unavailable"))
            });

        let path = DrivePath::parse("/a").unwrap();
        let err = resolve(&store, &path).await.unwrap_err();
        assert!(err.is_transient());
    }
}
