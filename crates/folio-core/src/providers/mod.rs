// Feed source implementations
pub mod github;

pub use github::GitHubSource;
