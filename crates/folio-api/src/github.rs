use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// GitHub refuses `per_page` values above this.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// A repository as the `/users/{user}/repos` endpoint returns it.
///
/// Only the fields the feed displays are kept; GitHub sends many more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topics: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `"topics": null` shows up on some repositories; treat it like a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// What a successful listing request returned.
///
/// GitHub occasionally answers with a 2xx and an object body (error
/// envelopes, proxies, captive portals). That case is kept apart from a
/// proper array so callers can decide how to treat it.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoListing {
    Repositories(Vec<GitHubRepo>),
    Unexpected(serde_json::Value),
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or a local stub server
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        Self::build(token, base_url, None)
    }

    /// Same as `with_base_url`, but every request gives up after `timeout`
    pub fn with_timeout(token: Option<String>, base_url: String, timeout: Duration) -> Result<Self> {
        Self::build(token, base_url, Some(timeout))
    }

    fn build(token: Option<String>, base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!("folio/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List a user's public repositories, most recently updated first.
    ///
    /// `per_page` is clamped to `MAX_PER_PAGE`. Only the first page is
    /// requested, so anything past `per_page` is silently cut off.
    pub async fn list_user_repos(&self, username: &str, per_page: u32) -> Result<RepoListing> {
        let url = format!(
            "{}/users/{}/repos",
            self.base_url,
            urlencoding::encode(username)
        );
        let per_page = per_page.clamp(1, MAX_PER_PAGE);

        let mut request = self
            .client
            .get(&url)
            .query(&[("sort", "updated"), ("per_page", &per_page.to_string())]);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        debug!("GET {} (per_page={})", url, per_page);
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound(username.to_string()));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GitHubError::AuthRequired);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || is_rate_limited(&response) {
            return Err(GitHubError::RateLimitExceeded);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        parse_listing(&body)
    }
}

/// GitHub signals an exhausted quota with a 403 and a zero remaining count.
fn is_rate_limited(response: &reqwest::Response) -> bool {
    response.status() == reqwest::StatusCode::FORBIDDEN
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0")
}

/// Split a response body into a repository array or "something else".
///
/// A body that isn't JSON at all, or an array whose items aren't
/// repositories, is a parse error.
pub fn parse_listing(body: &str) -> Result<RepoListing> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    if value.is_array() {
        let repos: Vec<GitHubRepo> = serde_json::from_value(value)?;
        Ok(RepoListing::Repositories(repos))
    } else {
        Ok(RepoListing::Unexpected(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "full_name": format!("diegosarina/{}", name),
            "description": null,
            "html_url": format!("https://github.com/diegosarina/{}", name),
            "stargazers_count": 3,
            "language": "Rust",
            "topics": ["cli"],
            "updated_at": "2024-05-01T12:00:00Z",
            "fork": false
        })
    }

    #[test]
    fn test_parse_listing_array() {
        let body = json!([repo_json(1, "a"), repo_json(2, "b")]).to_string();

        match parse_listing(&body).unwrap() {
            RepoListing::Repositories(repos) => {
                let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
                assert_eq!(repos[0].topics, vec!["cli".to_string()]);
                assert!(repos[0].updated_at.is_some());
            }
            other => panic!("expected repositories, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_listing_missing_optional_fields() {
        let body = r#"[{"id": 7, "name": "bare", "html_url": "https://github.com/x/bare"}]"#;

        match parse_listing(body).unwrap() {
            RepoListing::Repositories(repos) => {
                assert_eq!(repos[0].stargazers_count, 0);
                assert!(repos[0].topics.is_empty());
                assert!(repos[0].description.is_none());
                assert!(repos[0].language.is_none());
            }
            other => panic!("expected repositories, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_listing_null_topics() {
        let mut third = repo_json(3, "c");
        third["topics"] = serde_json::Value::Null;
        let body = json!([repo_json(1, "a"), repo_json(2, "b"), third]).to_string();

        match parse_listing(&body).unwrap() {
            RepoListing::Repositories(repos) => {
                assert_eq!(repos.len(), 3);
                assert!(repos[2].topics.is_empty());
                assert_eq!(repos[0].topics, vec!["cli".to_string()]);
            }
            other => panic!("expected repositories, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_listing_object_is_unexpected() {
        let body = r#"{"message": "Not Found", "documentation_url": "https://docs.github.com"}"#;
        assert!(matches!(parse_listing(body).unwrap(), RepoListing::Unexpected(_)));
    }

    #[test]
    fn test_parse_listing_rejects_garbage() {
        assert!(matches!(parse_listing("<html>"), Err(GitHubError::ParseError(_))));
        assert!(matches!(parse_listing(r#"[1, 2, 3]"#), Err(GitHubError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_list_user_repos_sends_expected_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/diegosarina/repos"))
            .and(query_param("sort", "updated"))
            .and(query_param("per_page", "6"))
            .and(header("accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json(1, "a")])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(None, server.uri()).unwrap();
        let listing = client.list_user_repos("diegosarina", 6).await.unwrap();

        assert!(matches!(listing, RepoListing::Repositories(ref r) if r.len() == 1));
    }

    #[tokio::test]
    async fn test_list_user_repos_clamps_per_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/someone/repos"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(None, server.uri()).unwrap();
        let listing = client.list_user_repos("someone", 500).await.unwrap();

        assert_eq!(listing, RepoListing::Repositories(Vec::new()));
    }

    #[tokio::test]
    async fn test_list_user_repos_sends_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(Some("secret".to_string()), server.uri()).unwrap();
        assert!(client.list_user_repos("someone", 5).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_user_repos_status_mapping() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/ghost/repos"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/limited/repos"))
            .respond_with(ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/down/repos"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(None, server.uri()).unwrap();

        assert!(matches!(
            client.list_user_repos("ghost", 6).await,
            Err(GitHubError::NotFound(ref user)) if user == "ghost"
        ));
        assert!(matches!(
            client.list_user_repos("limited", 6).await,
            Err(GitHubError::RateLimitExceeded)
        ));
        match client.list_user_repos("down", 6).await {
            Err(GitHubError::RequestFailed { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "unavailable");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_user_repos_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client =
            GitHubClient::with_timeout(None, server.uri(), Duration::from_millis(50)).unwrap();

        assert!(matches!(
            client.list_user_repos("slow", 6).await,
            Err(GitHubError::NetworkError(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            GitHubClient::with_base_url(None, "https://github.example.com/api/v3/".to_string())
                .unwrap();
        assert_eq!(client.base_url(), "https://github.example.com/api/v3");
    }
}
