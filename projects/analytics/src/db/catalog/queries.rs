use diesel::{prelude::*, sql_query, sql_types::Text};
use thiserror::Error;

use crate::db::{
    catalog::models::{ColumnName, KnownTable},
    commit::queries::{count_commits, CountCommitsError},
    issue::queries::{count_issues, CountIssuesError},
    repo_info::queries::{count_repo_info, CountRepoInfoError},
};

#[derive(Debug, Error)]
pub enum GetTableColumnsError {
    #[error("GetTableColumns: {source}")]
    GetTableColumns {
        #[from]
        source: diesel::result::Error,
    },
}

/// Column names of a public table in ordinal order.
pub fn get_table_columns(
    conn: &mut PgConnection,
    table: KnownTable,
) -> Result<Vec<String>, GetTableColumnsError> {
    sql_query(
        "SELECT column_name::text AS column_name \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = $1 \
         ORDER BY ordinal_position",
    )
    .bind::<Text, _>(table.as_str())
    .load::<ColumnName>(conn)
    .map(|rows| rows.into_iter().map(|row| row.column_name).collect())
    .map_err(|source| GetTableColumnsError::GetTableColumns { source })
}

#[derive(Debug, Error)]
pub enum CountTableRowsError {
    #[error(transparent)]
    Issues {
        #[from]
        source: CountIssuesError,
    },
    #[error(transparent)]
    Commits {
        #[from]
        source: CountCommitsError,
    },
    #[error(transparent)]
    RepoInfo {
        #[from]
        source: CountRepoInfoError,
    },
}

pub fn count_table_rows(
    conn: &mut PgConnection,
    table: KnownTable,
) -> Result<i64, CountTableRowsError> {
    let count = match table {
        KnownTable::Issues => count_issues(conn)?,
        KnownTable::Commits => count_commits(conn)?,
        KnownTable::RepoInfo => count_repo_info(conn)?,
    };

    Ok(count)
}
