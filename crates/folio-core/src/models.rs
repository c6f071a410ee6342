use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One public repository as the listing API describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u32,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Where a feed is in its one-shot lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Loading,
    Ready,
    Failed,
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedStatus::Loading => write!(f, "loading"),
            FeedStatus::Ready => write!(f, "ready"),
            FeedStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Repository names that never show up in the feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop excluded records, keeping the rest in their original order
    pub fn apply(&self, records: Vec<RepositoryRecord>) -> Vec<RepositoryRecord> {
        if self.is_empty() {
            return records;
        }

        records
            .into_iter()
            .filter(|record| !self.contains(&record.name))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// State of the Projects page feed for one page activation
///
/// Starts as `Loading` and settles exactly once, to `Ready` or `Failed`.
/// Records exist only in the `Ready` state and never include an excluded
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedState {
    status: FeedStatus,
    records: Option<Vec<RepositoryRecord>>,
    excluded_names: ExclusionSet,
}

impl FeedState {
    pub fn loading(excluded_names: ExclusionSet) -> Self {
        Self {
            status: FeedStatus::Loading,
            records: None,
            excluded_names,
        }
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    /// `None` unless the feed is `Ready`
    pub fn records(&self) -> Option<&[RepositoryRecord]> {
        self.records.as_deref()
    }

    pub fn excluded_names(&self) -> &ExclusionSet {
        &self.excluded_names
    }

    pub fn is_settled(&self) -> bool {
        self.status != FeedStatus::Loading
    }

    /// Settle as `Ready`, filtering out excluded names
    pub fn finish_ready(&mut self, records: Vec<RepositoryRecord>) -> Result<()> {
        self.ensure_loading()?;
        self.records = Some(self.excluded_names.apply(records));
        self.status = FeedStatus::Ready;
        Ok(())
    }

    /// Settle as `Failed`
    pub fn fail(&mut self) -> Result<()> {
        self.ensure_loading()?;
        self.status = FeedStatus::Failed;
        Ok(())
    }

    fn ensure_loading(&self) -> Result<()> {
        if self.is_settled() {
            return Err(Error::AlreadySettled(self.status));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn record(id: u64, name: &str) -> RepositoryRecord {
    RepositoryRecord {
        id,
        name: name.to_string(),
        description: None,
        url: format!("https://github.com/diegosarina/{}", name),
        stars: 0,
        language: None,
        topics: Vec::new(),
        updated_at: None,
    }
}
