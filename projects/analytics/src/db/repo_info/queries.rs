use diesel::prelude::*;
use thiserror::Error;

use crate::db::{repo_info::models::*, schema::repo_info::dsl::*};

#[derive(Debug, Error)]
pub enum InsertRepoInfoError {
    #[error("InsertRepoInfo: {source}")]
    InsertRepoInfo {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn insert_repo_info(
    conn: &mut PgConnection,
    new: &NewRepoInfo,
) -> Result<usize, InsertRepoInfoError> {
    diesel::insert_into(repo_info)
        .values(new)
        .on_conflict(id)
        .do_nothing()
        .execute(conn)
        .map_err(|source| InsertRepoInfoError::InsertRepoInfo { source })
}

#[derive(Debug, Error)]
pub enum CountRepoInfoError {
    #[error("CountRepoInfo: {source}")]
    CountRepoInfo {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn count_repo_info(conn: &mut PgConnection) -> Result<i64, CountRepoInfoError> {
    repo_info
        .count()
        .get_result(conn)
        .map_err(|source| CountRepoInfoError::CountRepoInfo { source })
}
