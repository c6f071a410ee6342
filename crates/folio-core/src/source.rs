use async_trait::async_trait;

use crate::{models::RepositoryRecord, Result};

/// What a source handed back for a successful request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceListing {
    /// A proper list, in the order the remote sent it
    Records(Vec<RepositoryRecord>),
    /// The request succeeded but the body wasn't a list. Carries a short
    /// description of what came back, for logs.
    NotAList(String),
}

/// Somewhere a user's repositories can be listed from
///
/// GitHub is the only real implementation; tests plug in their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// List up to `max_count` repositories owned by `username`, most
    /// recently updated first
    async fn list_repositories(&self, username: &str, max_count: u32) -> Result<SourceListing>;
}
