use diesel::prelude::*;
use thiserror::Error;

use crate::db::{commit::models::*, schema::commits::dsl::*};

#[derive(Debug, Error)]
pub enum InsertCommitsError {
    #[error("InsertCommits: {source}")]
    InsertCommits {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn insert_commits(
    conn: &mut PgConnection,
    new: &[NewCommit],
) -> Result<usize, InsertCommitsError> {
    if new.is_empty() {
        return Ok(0);
    }

    diesel::insert_into(commits)
        .values(new)
        .on_conflict(sha)
        .do_nothing()
        .execute(conn)
        .map_err(|source| InsertCommitsError::InsertCommits { source })
}

#[derive(Debug, Error)]
pub enum CountCommitsError {
    #[error("CountCommits: {source}")]
    CountCommits {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn count_commits(conn: &mut PgConnection) -> Result<i64, CountCommitsError> {
    commits
        .count()
        .get_result(conn)
        .map_err(|source| CountCommitsError::CountCommits { source })
}
