use chrono::NaiveDateTime;
use diesel::prelude::*;
use interfaces_github_repo_data::types::CommitPayload;

use crate::db::schema::commits;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = commits)]
pub struct NewCommit {
    pub sha: String,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub comments_url: Option<String>,
    pub author: Option<String>,
    pub committer: Option<String>,
    pub parents: Option<String>,
    pub committed_at: Option<NaiveDateTime>,
}

impl From<&CommitPayload> for NewCommit {
    fn from(payload: &CommitPayload) -> Self {
        let parents = payload
            .parents
            .iter()
            .map(|parent| parent.sha.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let committed_at = payload
            .commit
            .as_ref()
            .and_then(|detail| detail.committer.as_ref().or(detail.author.as_ref()))
            .and_then(|actor| actor.date)
            .map(|at| at.naive_utc());

        Self {
            sha: payload.sha.clone(),
            node_id: payload.node_id.clone(),
            url: payload.url.clone(),
            html_url: payload.html_url.clone(),
            comments_url: payload.comments_url.clone(),
            author: payload.author_name(),
            committer: payload.committer_name(),
            parents: Some(parents).filter(|joined| !joined.is_empty()),
            committed_at,
        }
    }
}
