// GitHub provider - bridges the API client with the FeedSource trait
use std::time::Duration;

use async_trait::async_trait;
use folio_api::{GitHubClient, GitHubRepo, RepoListing};

use crate::{
    config::GitHubConfig,
    models::RepositoryRecord,
    source::{FeedSource, SourceListing},
    Result,
};

/// Wrapper around GitHubClient that implements FeedSource
pub struct GitHubSource {
    client: GitHubClient,
}

impl GitHubSource {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = GitHubClient::with_timeout(
            config.token.clone(),
            config.api_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for GitHubSource {
    async fn list_repositories(&self, username: &str, max_count: u32) -> Result<SourceListing> {
        let listing = self.client.list_user_repos(username, max_count).await?;

        Ok(match listing {
            RepoListing::Repositories(repos) => {
                SourceListing::Records(repos.into_iter().map(github_to_record).collect())
            }
            RepoListing::Unexpected(value) => SourceListing::NotAList(describe_payload(&value)),
        })
    }
}

/// Convert GitHub API repo to our internal record
fn github_to_record(gh: GitHubRepo) -> RepositoryRecord {
    RepositoryRecord {
        id: gh.id,
        name: gh.name,
        description: gh.description,
        url: gh.html_url,
        stars: gh.stargazers_count,
        language: gh.language,
        topics: gh.topics,
        updated_at: gh.updated_at,
    }
}

fn describe_payload(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(message) = map.get("message").and_then(|m| m.as_str()) {
                return format!("object with message {:?}", message);
            }
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(_) => "boolean".to_string(),
        serde_json::Value::Number(_) => "number".to_string(),
        serde_json::Value::String(_) => "string".to_string(),
        serde_json::Value::Array(_) => "array".to_string(),
    }
}
