use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilestonePayload {
    pub title: Option<String>,
}

/// One element of `GET /repos/{owner}/{repo}/issues`. Pull requests are
/// listed there too and are kept as issues.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub id: i64,
    pub repository_url: Option<String>,
    pub number: Option<i32>,
    pub title: Option<String>,
    pub user: Option<UserPayload>,
    pub state: Option<String>,
    pub locked: Option<bool>,
    pub assignee: Option<UserPayload>,
    #[serde(default)]
    pub assignees: Vec<UserPayload>,
    pub milestone: Option<MilestonePayload>,
    pub comments: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitActorPayload {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetailPayload {
    pub author: Option<GitActorPayload>,
    pub committer: Option<GitActorPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentPayload {
    pub sha: String,
}

/// One element of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitPayload {
    pub sha: String,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub comments_url: Option<String>,
    // Null when the git identity is not linked to a GitHub account.
    pub author: Option<UserPayload>,
    pub committer: Option<UserPayload>,
    pub commit: Option<CommitDetailPayload>,
    #[serde(default)]
    pub parents: Vec<ParentPayload>,
}

impl CommitPayload {
    pub fn author_name(&self) -> Option<String> {
        self.author.as_ref().map(|user| user.login.clone()).or_else(|| {
            self.commit
                .as_ref()
                .and_then(|detail| detail.author.as_ref())
                .and_then(|actor| actor.name.clone())
        })
    }

    pub fn committer_name(&self) -> Option<String> {
        self.committer.as_ref().map(|user| user.login.clone()).or_else(|| {
            self.commit
                .as_ref()
                .and_then(|detail| detail.committer.as_ref())
                .and_then(|actor| actor.name.clone())
        })
    }
}

/// `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoPayload {
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
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_payload_keeps_nested_logins() {
        let raw = r#"{
            "id": 1001,
            "repository_url": "https://api.github.com/repos/octo/demo",
            "number": 7,
            "title": "Crash on start",
            "user": {"login": "alice", "id": 1},
            "state": "open",
            "locked": false,
            "assignee": {"login": "bob"},
            "assignees": [{"login": "bob"}, {"login": "carol"}],
            "milestone": {"title": "v1.0", "number": 3},
            "comments": 4,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00Z",
            "closed_at": null,
            "body": null,
            "labels": []
        }"#;

        let issue: IssuePayload = serde_json::from_str(raw).unwrap();
        assert_eq!(issue.user.unwrap().login, "alice");
        assert_eq!(issue.assignees.len(), 2);
        assert_eq!(issue.milestone.unwrap().title.as_deref(), Some("v1.0"));
        assert!(issue.closed_at.is_none());
    }

    #[test]
    fn commit_author_falls_back_to_git_name() {
        let raw = r#"{
            "sha": "abc123",
            "node_id": "C_1",
            "url": "https://api.github.com/repos/octo/demo/commits/abc123",
            "html_url": "https://github.com/octo/demo/commit/abc123",
            "comments_url": "https://api.github.com/repos/octo/demo/commits/abc123/comments",
            "author": null,
            "committer": {"login": "web-flow"},
            "commit": {
                "author": {"name": "Dana", "email": "dana@example.com", "date": "2024-05-01T10:00:00Z"},
                "committer": {"name": "GitHub", "date": "2024-05-01T10:00:00Z"}
            },
            "parents": [{"sha": "p1"}, {"sha": "p2"}]
        }"#;

        let commit: CommitPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(commit.author_name().as_deref(), Some("Dana"));
        assert_eq!(commit.committer_name().as_deref(), Some("web-flow"));
        assert_eq!(commit.parents.len(), 2);
    }
}
