use std::future::Future;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use interfaces_github_repo_data::{
    index::{
        fetch_repo_commits, fetch_repo_issues, fetch_repo_metadata, parse_response,
        since_days_ago, FetchRepoDataError, GitHubRestResult, ParseRepoDataError, PER_PAGE,
    },
    types::{CommitPayload, IssuePayload, RepoPayload},
};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::context::AppContext;
use crate::db::{
    commit::{models::NewCommit, queries::{insert_commits, InsertCommitsError}},
    issue::{models::NewIssue, queries::{insert_issues, InsertIssuesError}},
    repo_info::{models::NewRepoInfo, queries::{insert_repo_info, InsertRepoInfoError}},
    run_blocking, PgPool, RunBlockingError,
};

#[derive(Deserialize)]
pub struct SyncRequestBody {
    owner: String,
    name: String,
    token: Option<String>,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("InvalidRepository: {owner}/{name}")]
    InvalidRepository { owner: String, name: String },
    #[error("GITHUB_TOKEN not set and no token in request")]
    MissingToken,
    #[error(transparent)]
    SyncRepoData {
        #[from]
        source: SyncRepoDataError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            HandlerError::InvalidRepository { .. } | HandlerError::MissingToken => {
                StatusCode::BAD_REQUEST
            }
            HandlerError::SyncRepoData { source } => match source {
                SyncRepoDataError::FetchRepoData { .. }
                | SyncRepoDataError::ParseRepoData { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        (status, self.to_string()).into_response()
    }
}

/// Axum handler: POST /github/repo_data/sync
pub async fn handler(
    Extension(ctx): Extension<AppContext>,
    Json(input): Json<SyncRequestBody>,
) -> Result<impl IntoResponse, HandlerError> {
    if !is_valid_segment(&input.owner) || !is_valid_segment(&input.name) {
        return Err(HandlerError::InvalidRepository { owner: input.owner, name: input.name });
    }

    let token = input
        .token
        .or_else(|| ctx.config.github_token.clone())
        .ok_or(HandlerError::MissingToken)?;

    let report = sync_repo_data(
        &ctx.github,
        &ctx.pool,
        &token,
        &input.owner,
        &input.name,
        ctx.config.sync_since_days,
        ctx.config.github_max_pages,
    )
    .await?;

    Ok((StatusCode::OK, Json(report)))
}

/// Owner and repository names are single URL path segments.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub repository: String,
    pub since: String,
    pub issues_fetched: usize,
    pub issues_inserted: usize,
    pub commits_fetched: usize,
    pub commits_inserted: usize,
    pub repo_info_inserted: usize,
}

#[derive(Debug, Error)]
pub enum SyncRepoDataError {
    #[error("FetchRepoData: {source}")]
    FetchRepoData {
        #[from]
        source: FetchRepoDataError,
    },
    #[error("ParseRepoData: {source}")]
    ParseRepoData {
        #[from]
        source: ParseRepoDataError,
    },
    #[error("InsertIssues: {source}")]
    InsertIssues {
        #[from]
        source: InsertIssuesError,
    },
    #[error("InsertCommits: {source}")]
    InsertCommits {
        #[from]
        source: InsertCommitsError,
    },
    #[error("InsertRepoInfo: {source}")]
    InsertRepoInfo {
        #[from]
        source: InsertRepoInfoError,
    },
    #[error(transparent)]
    RunBlocking {
        #[from]
        source: RunBlockingError,
    },
}

/// Fetches recent issues, commits and metadata of one repository and stores
/// the rows not already present.
pub async fn sync_repo_data(
    client: &Client,
    pool: &PgPool,
    token: &str,
    owner: &str,
    name: &str,
    since_days: i64,
    max_pages: u32,
) -> Result<SyncReport, SyncRepoDataError> {
    let since = since_days_ago(Utc::now(), since_days);

    info!("Fetching issues for {}/{}", owner, name);
    let issues: Vec<IssuePayload> = fetch_all_pages(max_pages, |page| {
        fetch_repo_issues(client, token, owner, name, &since, page)
    })
    .await?;

    info!("Fetching commits for {}/{}", owner, name);
    let commits: Vec<CommitPayload> = fetch_all_pages(max_pages, |page| {
        fetch_repo_commits(client, token, owner, name, &since, page)
    })
    .await?;

    info!("Fetching metadata for {}/{}", owner, name);
    let repo: RepoPayload = parse_response(fetch_repo_metadata(client, token, owner, name).await?)?;

    let new_issues: Vec<NewIssue> = issues.iter().map(NewIssue::from).collect();
    let new_commits: Vec<NewCommit> = commits.iter().map(NewCommit::from).collect();
    let new_repo = NewRepoInfo::from(&repo);

    let (issues_inserted, commits_inserted, repo_info_inserted) =
        run_blocking(pool, move |conn| {
            let issues_inserted = new_issues
                .chunks(PER_PAGE)
                .map(|chunk| insert_issues(conn, chunk))
                .sum::<Result<usize, _>>()?;
            let commits_inserted = new_commits
                .chunks(PER_PAGE)
                .map(|chunk| insert_commits(conn, chunk))
                .sum::<Result<usize, _>>()?;
            let repo_info_inserted = insert_repo_info(conn, &new_repo)?;
            Ok::<_, SyncRepoDataError>((issues_inserted, commits_inserted, repo_info_inserted))
        })
        .await?;

    let report = SyncReport {
        repository: format!("{owner}/{name}"),
        since,
        issues_fetched: issues.len(),
        issues_inserted,
        commits_fetched: commits.len(),
        commits_inserted,
        repo_info_inserted,
    };
    info!(?report, "repository synced");

    Ok(report)
}

/// Follows `page=1..` until a short page or `max_pages`.
async fn fetch_all_pages<T, F, Fut>(
    max_pages: u32,
    mut fetch: F,
) -> Result<Vec<T>, SyncRepoDataError>
where
    T: DeserializeOwned,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<GitHubRestResult, FetchRepoDataError>>,
{
    let mut items = Vec::new();

    for page in 1..=max_pages.max(1) {
        let batch: Vec<T> = parse_response(fetch(page).await?)?;
        let last_page = batch.len() < PER_PAGE;
        items.extend(batch);
        if last_page {
            break;
        }
    }

    Ok(items)
}
