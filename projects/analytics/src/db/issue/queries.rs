use diesel::prelude::*;
use thiserror::Error;

use crate::db::{issue::models::*, schema::issues::dsl::*};

#[derive(Debug, Error)]
pub enum InsertIssuesError {
    #[error("InsertIssues: {source}")]
    InsertIssues {
        #[from]
        source: diesel::result::Error,
    },
}

/// Inserts issues, skipping ids already stored. Returns the number of new rows.
pub fn insert_issues(
    conn: &mut PgConnection,
    new: &[NewIssue],
) -> Result<usize, InsertIssuesError> {
    if new.is_empty() {
        return Ok(0);
    }

    diesel::insert_into(issues)
        .values(new)
        .on_conflict(id)
        .do_nothing()
        .execute(conn)
        .map_err(|source| InsertIssuesError::InsertIssues { source })
}

#[derive(Debug, Error)]
pub enum CountIssuesError {
    #[error("CountIssues: {source}")]
    CountIssues {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn count_issues(conn: &mut PgConnection) -> Result<i64, CountIssuesError> {
    issues
        .count()
        .get_result(conn)
        .map_err(|source| CountIssuesError::CountIssues { source })
}
