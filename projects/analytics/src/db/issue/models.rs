use chrono::NaiveDateTime;
use diesel::prelude::*;
use interfaces_github_repo_data::types::IssuePayload;

use crate::db::schema::issues;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issues)]
pub struct NewIssue {
    pub id: i64,
    pub repository_url: Option<String>,
    pub number: Option<i32>,
    pub title: Option<String>,
    pub user_login: Option<String>,
    pub state: Option<String>,
    pub locked: Option<bool>,
    pub assignee: Option<String>,
    pub assignees: Option<String>,
    pub milestone: Option<String>,
    pub comments: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub closed_at: Option<NaiveDateTime>,
    pub body: Option<String>,
}

impl From<&IssuePayload> for NewIssue {
    fn from(payload: &IssuePayload) -> Self {
        let assignees = payload
            .assignees
            .iter()
            .map(|user| user.login.as_str())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            id: payload.id,
            repository_url: payload.repository_url.clone(),
            number: payload.number,
            title: payload.title.clone(),
            user_login: payload.user.as_ref().map(|user| user.login.clone()),
            state: payload.state.clone(),
            locked: payload.locked,
            assignee: payload.assignee.as_ref().map(|user| user.login.clone()),
            assignees: Some(assignees).filter(|joined| !joined.is_empty()),
            milestone: payload.milestone.as_ref().and_then(|m| m.title.clone()),
            comments: payload.comments,
            created_at: payload.created_at.map(|at| at.naive_utc()),
            updated_at: payload.updated_at.map(|at| at.naive_utc()),
            closed_at: payload.closed_at.map(|at| at.naive_utc()),
            body: payload.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_payload_is_flattened() {
        let payload: IssuePayload = serde_json::from_str(
            r#"{
                "id": 9, "number": 3, "title": "t", "state": "closed",
                "user": {"login": "alice"},
                "assignee": null,
                "assignees": [{"login": "bob"}, {"login": "carol"}],
                "milestone": {"title": "v2"},
                "created_at": "2024-01-02T03:04:05Z",
                "closed_at": "2024-01-03T00:00:00Z"
            }"#,
        )
        .unwrap();

        let row = NewIssue::from(&payload);
        assert_eq!(row.user_login.as_deref(), Some("alice"));
        assert_eq!(row.assignee, None);
        assert_eq!(row.assignees.as_deref(), Some("bob,carol"));
        assert_eq!(row.milestone.as_deref(), Some("v2"));
        assert_eq!(row.created_at.unwrap().to_string(), "2024-01-02 03:04:05");
    }

    #[test]
    fn no_assignees_is_null_not_empty() {
        let payload: IssuePayload = serde_json::from_str(r#"{"id": 1}"#).unwrap();

        assert_eq!(NewIssue::from(&payload).assignees, None);
    }
}
