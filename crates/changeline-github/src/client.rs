//! GitHub metadata lookup client
//!
//! Resolves commit, pull request and author links through the GitHub GraphQL
//! API. Results are memoised per request for the lifetime of the client, so a
//! release touching the same commit from several packages queries it once.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use changeline_core::lookup::split_repo;
use changeline_core::{
    CommitInfoRequest, LinkSet, LookupError, PullRequestInfoRequest, RepoInfo, RepoInfoLookup,
};

use crate::graphql::{
    earliest_merged, CommitRepository, GraphQlResponse, PullRequestRepository, RepositoryData,
    COMMIT_QUERY, PULL_REQUEST_QUERY,
};

/// Default GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Default GitHub web URL.
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "changeline";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Commit(CommitInfoRequest),
    Pull(PullRequestInfoRequest),
}

/// GitHub implementation of [`RepoInfoLookup`]
pub struct GitHubInfo {
    client: Client,
    token: Option<String>,
    graphql_url: String,
    server_url: String,
    cache: Mutex<HashMap<CacheKey, RepoInfo>>,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubInfo")
            .field("has_token", &self.token.is_some())
            .field("graphql_url", &self.graphql_url)
            .field("server_url", &self.server_url)
            .finish()
    }
}

impl GitHubInfo {
    /// Create a client with an explicit token
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.filter(|t| !t.is_empty()),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Create a client from the environment.
    ///
    /// Reads `GITHUB_TOKEN`, and `GITHUB_GRAPHQL_URL` / `GITHUB_SERVER_URL` for
    /// GitHub Enterprise installations.
    pub fn from_env() -> Self {
        let mut info = Self::new(std::env::var("GITHUB_TOKEN").ok());
        if let Ok(url) = std::env::var("GITHUB_GRAPHQL_URL") {
            if !url.is_empty() {
                info.graphql_url = url;
            }
        }
        if let Ok(url) = std::env::var("GITHUB_SERVER_URL") {
            if !url.is_empty() {
                info.server_url = url;
            }
        }
        debug!(?info, "created GitHub lookup from environment");
        info
    }

    /// Use a custom GraphQL endpoint
    pub fn with_graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = url.into();
        self
    }

    /// Use a custom web URL for hand-built links
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Check whether a token is configured
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn headers(&self) -> Result<HeaderMap, LookupError> {
        let token = self.token.as_deref().ok_or(LookupError::MissingToken)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| LookupError::AuthFailed(format!("invalid token: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    fn cached(&self, key: &CacheKey) -> Option<RepoInfo> {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(key).cloned())
    }

    fn store(&self, key: CacheKey, info: &RepoInfo) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, info.clone());
        }
    }

    /// Execute a GraphQL query and return its `data`
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, LookupError> {
        let body = json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(&self.graphql_url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<GitHubErrorResponse>().await {
                Ok(err) => err.message,
                Err(_) => "Unknown error".to_string(),
            };
            return Err(map_status(status, message));
        }

        let result: GraphQlResponse<T> = response.json().await.map_err(|e| LookupError::Api {
            status: status.as_u16(),
            message: format!("Failed to parse GraphQL response: {}", e),
        })?;

        if let Some(error) = result.errors.first() {
            return Err(if error.is_not_found() {
                LookupError::NotFound(error.message.clone())
            } else {
                LookupError::Api {
                    status: status.as_u16(),
                    message: error.message.clone(),
                }
            });
        }

        result.data.ok_or_else(|| LookupError::Api {
            status: status.as_u16(),
            message: "GraphQL response contained no data".to_string(),
        })
    }
}

#[async_trait]
impl RepoInfoLookup for GitHubInfo {
    #[instrument(skip_all, fields(repo = %request.repo, commit = %request.commit))]
    async fn get_info(&self, request: CommitInfoRequest) -> Result<RepoInfo, LookupError> {
        let (owner, name) =
            split_repo(&request.repo).ok_or_else(|| LookupError::InvalidRepo(request.repo.clone()))?;
        if request.commit.is_empty() {
            return Err(LookupError::MissingCommit);
        }

        let key = CacheKey::Commit(request.clone());
        if let Some(info) = self.cached(&key) {
            debug!("commit info served from cache");
            return Ok(info);
        }

        let data: RepositoryData<CommitRepository> = self
            .query(
                COMMIT_QUERY,
                json!({ "owner": owner, "name": name, "expression": request.commit }),
            )
            .await?;

        let object = data
            .repository
            .and_then(|repo| repo.object)
            .ok_or_else(|| LookupError::NotFound(format!("commit {}", request.commit)))?;
        let commit_url = object
            .commit_url
            .ok_or_else(|| LookupError::NotFound(format!("commit {}", request.commit)))?;

        let nodes = object
            .associated_pull_requests
            .map(|conn| conn.nodes)
            .unwrap_or_default();
        let pull = earliest_merged(&nodes);

        let user = match pull {
            Some(pr) => pr.author.clone(),
            None => object.author.and_then(|author| author.user),
        };

        let short: String = request.commit.chars().take(7).collect();
        let info = RepoInfo {
            user: user.as_ref().map(|u| u.login.clone()),
            pull: pull.map(|pr| pr.number),
            commit: Some(request.commit.clone()),
            links: LinkSet {
                commit: Some(format!("[`{}`]({})", short, commit_url)),
                pull: pull.map(|pr| format!("[#{}]({})", pr.number, pr.url)),
                user: user.map(|u| format!("[@{}]({})", u.login, u.url)),
            },
        };
        debug!(pull = ?info.pull, user = ?info.user, "resolved commit info");

        self.store(key, &info);
        Ok(info)
    }

    #[instrument(skip_all, fields(repo = %request.repo, pull = request.pull))]
    async fn get_info_from_pull_request(
        &self,
        request: PullRequestInfoRequest,
    ) -> Result<RepoInfo, LookupError> {
        let (owner, name) =
            split_repo(&request.repo).ok_or_else(|| LookupError::InvalidRepo(request.repo.clone()))?;

        let key = CacheKey::Pull(request.clone());
        if let Some(info) = self.cached(&key) {
            debug!("pull request info served from cache");
            return Ok(info);
        }

        let data: RepositoryData<PullRequestRepository> = self
            .query(
                PULL_REQUEST_QUERY,
                json!({ "owner": owner, "name": name, "number": request.pull }),
            )
            .await?;

        let pr = data
            .repository
            .and_then(|repo| repo.pull_request)
            .ok_or_else(|| LookupError::NotFound(format!("pull request #{}", request.pull)))?;

        let merge_commit = pr.merge_commit;
        let user = pr.author;

        let info = RepoInfo {
            user: user.as_ref().map(|u| u.login.clone()),
            pull: Some(request.pull),
            commit: merge_commit.as_ref().map(|c| c.abbreviated_oid.clone()),
            links: LinkSet {
                commit: merge_commit.map(|c| {
                    let short: String = c.abbreviated_oid.chars().take(7).collect();
                    format!("[`{}`]({})", short, c.commit_url)
                }),
                pull: Some(format!(
                    "[#{}]({}/{}/pull/{})",
                    request.pull,
                    self.server_url.trim_end_matches('/'),
                    request.repo,
                    request.pull
                )),
                user: user.map(|u| format!("[@{}]({})", u.login, u.url)),
            },
        };
        debug!(commit = ?info.commit, user = ?info.user, "resolved pull request info");

        self.store(key, &info);
        Ok(info)
    }
}

/// GitHub error response body
#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Map a non-success HTTP status to a lookup error
fn map_status(status: StatusCode, message: String) -> LookupError {
    match status {
        StatusCode::UNAUTHORIZED => LookupError::AuthFailed("Invalid or expired token".into()),
        StatusCode::FORBIDDEN => LookupError::AuthFailed(format!("Permission denied: {}", message)),
        StatusCode::NOT_FOUND => LookupError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => LookupError::RateLimited,
        _ if status.is_server_error() => LookupError::Api {
            status: status.as_u16(),
            message: format!("GitHub server error: {}", message),
        },
        _ => LookupError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> GitHubInfo {
        GitHubInfo::new(Some("test-token".to_string()))
            .with_graphql_url(format!("{}/graphql", server.uri()))
    }

    #[tokio::test]
    async fn test_get_info_with_associated_pull_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "variables": { "owner": "o", "name": "r", "expression": "abc1234567890" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "repository": { "object": {
                    "commitUrl": "https://github.com/o/r/commit/abc1234567890",
                    "associatedPullRequests": { "nodes": [
                        {
                            "number": 12,
                            "url": "https://github.com/o/r/pull/12",
                            "mergedAt": null,
                            "author": { "login": "late", "url": "https://github.com/late" }
                        },
                        {
                            "number": 7,
                            "url": "https://github.com/o/r/pull/7",
                            "mergedAt": "2024-02-01T12:00:00Z",
                            "author": { "login": "octocat", "url": "https://github.com/octocat" }
                        }
                    ]},
                    "author": { "user": { "login": "committer", "url": "https://github.com/committer" } }
                }}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let lookup = client(&server).await;
        let info = lookup
            .get_info(CommitInfoRequest::new("o/r", "abc1234567890"))
            .await
            .unwrap();

        assert_eq!(info.pull, Some(7));
        assert_eq!(info.user.as_deref(), Some("octocat"));
        assert_eq!(
            info.links,
            LinkSet {
                commit: Some("[`abc1234`](https://github.com/o/r/commit/abc1234567890)".to_string()),
                pull: Some("[#7](https://github.com/o/r/pull/7)".to_string()),
                user: Some("[@octocat](https://github.com/octocat)".to_string()),
            }
        );

        // second call is served from the cache; `expect(1)` verifies on drop
        let again = lookup
            .get_info(CommitInfoRequest::new("o/r", "abc1234567890"))
            .await
            .unwrap();
        assert_eq!(again, info);
    }

    #[tokio::test]
    async fn test_get_info_without_pull_request_uses_commit_author() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "repository": { "object": {
                    "commitUrl": "https://github.com/o/r/commit/deadbeefcafe",
                    "associatedPullRequests": { "nodes": [] },
                    "author": { "user": { "login": "committer", "url": "https://github.com/committer" } }
                }}}
            })))
            .mount(&server)
            .await;

        let info = client(&server)
            .await
            .get_info(CommitInfoRequest::new("o/r", "deadbeefcafe"))
            .await
            .unwrap();

        assert_eq!(info.pull, None);
        assert_eq!(info.links.pull, None);
        assert_eq!(
            info.links.user.as_deref(),
            Some("[@committer](https://github.com/committer)")
        );
        assert_eq!(
            info.links.commit.as_deref(),
            Some("[`deadbee`](https://github.com/o/r/commit/deadbeefcafe)")
        );
    }

    #[tokio::test]
    async fn test_get_info_unknown_commit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "repository": { "object": null } }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get_info(CommitInfoRequest::new("o/r", "0000000"))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_info_from_pull_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({ "variables": { "number": 42 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "repository": { "pullRequest": {
                    "author": { "login": "octocat", "url": "https://github.com/octocat" },
                    "mergeCommit": {
                        "commitUrl": "https://github.com/o/r/commit/9f8e7d6c5b4a",
                        "abbreviatedOid": "9f8e7d6"
                    }
                }}}
            })))
            .mount(&server)
            .await;

        let info = client(&server)
            .await
            .get_info_from_pull_request(PullRequestInfoRequest::new("o/r", 42))
            .await
            .unwrap();

        assert_eq!(info.commit.as_deref(), Some("9f8e7d6"));
        assert_eq!(
            info.links,
            LinkSet {
                commit: Some("[`9f8e7d6`](https://github.com/o/r/commit/9f8e7d6c5b4a)".to_string()),
                pull: Some("[#42](https://github.com/o/r/pull/42)".to_string()),
                user: Some("[@octocat](https://github.com/octocat)".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_get_info_from_unmerged_pull_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "repository": { "pullRequest": {
                    "author": null,
                    "mergeCommit": null
                }}}
            })))
            .mount(&server)
            .await;

        let info = client(&server)
            .await
            .with_server_url("https://ghe.example.com/")
            .get_info_from_pull_request(PullRequestInfoRequest::new("o/r", 3))
            .await
            .unwrap();

        assert_eq!(info.links.commit, None);
        assert_eq!(info.links.user, None);
        assert_eq!(
            info.links.pull.as_deref(),
            Some("[#3](https://ghe.example.com/o/r/pull/3)")
        );
    }

    #[tokio::test]
    async fn test_graphql_not_found_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "repository": { "pullRequest": null } },
                "errors": [{
                    "type": "NOT_FOUND",
                    "message": "Could not resolve to a PullRequest with the number of 999."
                }]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get_info_from_pull_request(PullRequestInfoRequest::new("o/r", 999))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound(msg) if msg.contains("999")));
    }

    #[tokio::test]
    async fn test_graphql_other_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Something went wrong" }]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get_info(CommitInfoRequest::new("o/r", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Api { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_http_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get_info(CommitInfoRequest::new("o/r", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::AuthFailed(_)));
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, "gone".into()),
            LookupError::NotFound(_)
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            LookupError::RateLimited
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, "down".into()),
            LookupError::Api { status: 502, .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_repo_is_rejected_before_request() {
        let lookup = GitHubInfo::new(Some("t".to_string()))
            .with_graphql_url("http://127.0.0.1:9/graphql");
        let err = lookup
            .get_info(CommitInfoRequest::new("not-a-repo", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidRepo(_)));
    }

    #[tokio::test]
    async fn test_missing_commit() {
        let lookup = GitHubInfo::new(Some("t".to_string()));
        let err = lookup
            .get_info(CommitInfoRequest::new("o/r", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::MissingCommit));
    }

    #[tokio::test]
    async fn test_missing_token() {
        let lookup = GitHubInfo::new(None).with_graphql_url("http://127.0.0.1:9/graphql");
        assert!(!lookup.has_token());
        let err = lookup
            .get_info_from_pull_request(PullRequestInfoRequest::new("o/r", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::MissingToken));
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_debug_hides_token() {
        let lookup = GitHubInfo::new(Some("secret-token".to_string()));
        let debug = format!("{:?}", lookup);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("has_token: true"));
    }
}
