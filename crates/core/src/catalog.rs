//! Catalog collaborator surface
//!
//! The catalog is the external tree of discoverable sources and sub-lists.
//! The core only reads it and triggers child fetches on user expansion; it
//! never owns caching or refresh policy.

use crate::Result;
use async_trait::async_trait;

/// One discoverable source (or sub-list head) in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Opaque source identifier, URI-like
    pub uri: String,
    /// Human-readable description (e.g. a recording timestamp)
    pub description: String,
}

/// Fetch progress for one catalog node's child list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Children never requested
    #[default]
    Idle,
    /// `fetch_children` in flight
    Fetching,
    /// Child list populated
    Fetched,
}

/// Live view of one catalog node
#[derive(Debug, Clone, Default)]
pub struct UriInfo {
    /// Whether the node advertises a sub-list
    pub has_children: bool,
    /// Child-list fetch progress
    pub fetch_state: FetchState,
    /// Ordered child entries (empty until fetched)
    pub children: Vec<CatalogEntry>,
}

/// Read-only client over the source catalog
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Top-level catalog entries
    fn root_entries(&self) -> Vec<CatalogEntry>;

    /// Current info for a URI, if the catalog knows it
    fn uri_info(&self, uri: &str) -> Option<UriInfo>;

    /// Request the child list for a URI. Completion is observable through
    /// subsequent `uri_info` reads.
    async fn fetch_children(&self, uri: &str) -> Result<()>;
}
