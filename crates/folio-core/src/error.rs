use thiserror::Error;

use crate::models::FeedStatus;

/// Everything that can go wrong while producing the repository feed
///
/// None of these reach the page directly: the loader folds them all into
/// `FeedStatus::Failed`. They exist for logging and for the CLI.
#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    GitHub(#[from] folio_api::GitHubError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Feed already settled as {0}")]
    AlreadySettled(FeedStatus),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
