// GitHub API client used by the repository feed
pub mod github;

pub use github::{GitHubClient, GitHubError, GitHubRepo, RepoListing, MAX_PER_PAGE};
