use chrono::NaiveDateTime;
use diesel::prelude::*;
use interfaces_github_repo_data::types::RepoPayload;

use crate::db::schema::repo_info;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = repo_info)]
pub struct NewRepoInfo {
    pub id: i64,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub stargazers_count: Option<i32>,
    pub watchers_count: Option<i32>,
    pub forks_count: Option<i32>,
    pub open_issues_count: Option<i32>,
    pub language: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub pushed_at: Option<NaiveDateTime>,
}

impl From<&RepoPayload> for NewRepoInfo {
    fn from(payload: &RepoPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name.clone(),
            full_name: payload.full_name.clone(),
            description: payload.description.clone(),
            html_url: payload.html_url.clone(),
            stargazers_count: payload.stargazers_count,
            watchers_count: payload.watchers_count,
            forks_count: payload.forks_count,
            open_issues_count: payload.open_issues_count,
            language: payload.language.clone(),
            created_at: payload.created_at.map(|at| at.naive_utc()),
            updated_at: payload.updated_at.map(|at| at.naive_utc()),
            pushed_at: payload.pushed_at.map(|at| at.naive_utc()),
        }
    }
}
