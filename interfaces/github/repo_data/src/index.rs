use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Page size requested from list endpoints. A page shorter than this is the last one.
pub const PER_PAGE: usize = 100;

pub struct GitHubRestResult {
    pub body: String,
    pub status: StatusCode,
}

/// `since` parameter for list endpoints: `days` before `now`, RFC 3339 with a `Z` suffix.
pub fn since_days_ago(now: DateTime<Utc>, days: i64) -> String {
    (now - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub async fn fetch_repo_issues(
    client: &Client,
    token: &str,
    owner: &str,
    name: &str,
    since: &str,
    page: u32,
) -> Result<GitHubRestResult, FetchRepoDataError> {
    let url = format!("{GITHUB_API_BASE}/repos/{owner}/{name}/issues");
    let query = [
        ("since", since.to_string()),
        ("state", "all".to_string()),
        ("per_page", PER_PAGE.to_string()),
        ("page", page.to_string()),
    ];

    get(client, token, &url, &query).await
}

pub async fn fetch_repo_commits(
    client: &Client,
    token: &str,
    owner: &str,
    name: &str,
    since: &str,
    page: u32,
) -> Result<GitHubRestResult, FetchRepoDataError> {
    let url = format!("{GITHUB_API_BASE}/repos/{owner}/{name}/commits");
    let query = [
        ("since", since.to_string()),
        ("per_page", PER_PAGE.to_string()),
        ("page", page.to_string()),
    ];

    get(client, token, &url, &query).await
}

pub async fn fetch_repo_metadata(
    client: &Client,
    token: &str,
    owner: &str,
    name: &str,
) -> Result<GitHubRestResult, FetchRepoDataError> {
    let url = format!("{GITHUB_API_BASE}/repos/{owner}/{name}");

    get(client, token, &url, &[]).await
}

async fn get(
    client: &Client,
    token: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<GitHubRestResult, FetchRepoDataError> {
    let response = client
        .get(url)
        .query(query)
        .header("Authorization", format!("Bearer {token}"))
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", "rust-client")
        .send()
        .await
        .map_err(|source| FetchRepoDataError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchRepoDataError::ResponseRead { source })?;

    Ok(GitHubRestResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchRepoDataError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum ParseRepoDataError {
    #[error("UnexpectedStatus: {status}: {body}")]
    UnexpectedStatus {
        status: StatusCode,
        body: String,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },
}

/// Checks the status and decodes the body of a GitHub response.
pub fn parse_response<T: DeserializeOwned>(
    result: GitHubRestResult,
) -> Result<T, ParseRepoDataError> {
    if !result.status.is_success() {
        return Err(ParseRepoDataError::UnexpectedStatus {
            status: result.status,
            body: result.body,
        });
    }

    Ok(serde_json::from_str(&result.body)?)
}
