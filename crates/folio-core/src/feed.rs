// Repository feed loading: one request, one filter, one settled state
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    models::{ExclusionSet, FeedState},
    source::{FeedSource, SourceListing},
    Error, Result,
};

/// How to treat a successful response whose body isn't a list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Show an empty feed
    #[default]
    Lenient,
    /// Treat it like any other failure
    Strict,
}

/// Validated inputs for one feed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    username: String,
    max_count: u32,
    excluded: ExclusionSet,
}

impl FeedRequest {
    pub fn new(username: impl Into<String>, max_count: u32, excluded: ExclusionSet) -> Result<Self> {
        let username = username.into();
        let username = username.trim().to_string();

        if username.is_empty() {
            return Err(Error::ConfigError("GitHub username must not be empty".into()));
        }

        if max_count == 0 {
            return Err(Error::ConfigError("max_count must be greater than zero".into()));
        }

        Ok(Self {
            username,
            max_count,
            excluded,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn excluded(&self) -> &ExclusionSet {
        &self.excluded
    }
}

/// Fetch the feed once and settle it.
///
/// Every failure (transport, status code, body) ends up as `Failed`; the
/// cause is only logged. There is no retry.
pub async fn fetch_feed(
    source: &dyn FeedSource,
    request: &FeedRequest,
    policy: MalformedPolicy,
) -> FeedState {
    let mut state = FeedState::loading(request.excluded.clone());

    let settled = match source
        .list_repositories(&request.username, request.max_count)
        .await
    {
        Ok(SourceListing::Records(mut records)) => {
            // sources may ignore the page size
            records.truncate(request.max_count as usize);
            debug!(
                "Received {} repositories for {}",
                records.len(),
                request.username
            );
            state.finish_ready(records)
        }
        Ok(SourceListing::NotAList(summary)) => match policy {
            MalformedPolicy::Lenient => {
                warn!(
                    "Repository listing for {} was not a list ({}); showing an empty feed",
                    request.username, summary
                );
                state.finish_ready(Vec::new())
            }
            MalformedPolicy::Strict => {
                warn!(
                    "Repository listing for {} was not a list ({})",
                    request.username, summary
                );
                state.fail()
            }
        },
        Err(e) => {
            warn!("Failed to load repositories for {}: {}", request.username, e);
            state.fail()
        }
    };

    if let Err(e) = settled {
        debug!("Ignoring second settle: {}", e);
    }

    if let Some(records) = state.records() {
        info!(
            "Feed ready for {} with {} repositories",
            request.username,
            records.len()
        );
    }

    state
}

/// Everything a page needs to (re)load its feed
///
/// Cheap to clone; each page activation takes its own copy into the
/// spawned fetch.
#[derive(Clone)]
pub struct FeedLoader {
    source: Arc<dyn FeedSource>,
    request: FeedRequest,
    policy: MalformedPolicy,
}

impl FeedLoader {
    pub fn new(source: Arc<dyn FeedSource>, request: FeedRequest) -> Self {
        Self {
            source,
            request,
            policy: MalformedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn request(&self) -> &FeedRequest {
        &self.request
    }

    pub async fn fetch_feed(&self) -> FeedState {
        fetch_feed(self.source.as_ref(), &self.request, self.policy).await
    }
}
