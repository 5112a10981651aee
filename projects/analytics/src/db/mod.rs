pub mod catalog;
pub mod commit;
pub mod issue;
pub mod readonly;
pub mod repo_info;
pub mod schema;

use std::time::Duration;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::{prelude::*, sql_query, PgConnection};
use thiserror::Error;
use tracing::info;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the pool without opening a connection; failures surface on first checkout.
pub fn build_pool(database_url: &str) -> PgPool {
    Pool::builder()
        .connection_timeout(Duration::from_secs(5))
        .build_unchecked(ConnectionManager::<PgConnection>::new(database_url))
}

pub const TABLES_DDL: [(&str, &str); 3] = [
    (
        "issues",
        "CREATE TABLE IF NOT EXISTS issues (
            id BIGINT PRIMARY KEY,
            repository_url TEXT,
            number INT,
            title TEXT,
            user_login TEXT,
            state TEXT,
            locked BOOLEAN,
            assignee TEXT,
            assignees TEXT,
            milestone TEXT,
            comments INT,
            created_at TIMESTAMP,
            updated_at TIMESTAMP,
            closed_at TIMESTAMP,
            body TEXT
        )",
    ),
    (
        "commits",
        "CREATE TABLE IF NOT EXISTS commits (
            sha TEXT PRIMARY KEY,
            node_id TEXT,
            url TEXT,
            html_url TEXT,
            comments_url TEXT,
            author TEXT,
            committer TEXT,
            parents TEXT,
            committed_at TIMESTAMP
        )",
    ),
    (
        "repo_info",
        "CREATE TABLE IF NOT EXISTS repo_info (
            id BIGINT PRIMARY KEY,
            name TEXT,
            full_name TEXT,
            description TEXT,
            html_url TEXT,
            stargazers_count INT,
            watchers_count INT,
            forks_count INT,
            open_issues_count INT,
            language TEXT,
            created_at TIMESTAMP,
            updated_at TIMESTAMP,
            pushed_at TIMESTAMP
        )",
    ),
];

#[derive(Debug, Error)]
pub enum EnsureTablesError {
    #[error("CreateTable {table}: {source}")]
    CreateTable {
        table: &'static str,
        source: diesel::result::Error,
    },
}

pub fn ensure_tables(conn: &mut PgConnection) -> Result<(), EnsureTablesError> {
    for (table, ddl) in TABLES_DDL {
        sql_query(ddl)
            .execute(conn)
            .map_err(|source| EnsureTablesError::CreateTable { table, source })?;
        info!("Table '{}' ensured in DB", table);
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum RunBlockingError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error("JoinBlockingTask: {source}")]
    JoinBlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Checks out a connection and runs `work` on tokio's blocking pool.
pub async fn run_blocking<T, E, F>(pool: &PgPool, work: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<RunBlockingError> + Send + 'static,
{
    let pool = pool.clone();

    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(RunBlockingError::from)?;
        work(&mut conn)
    })
    .await
    .map_err(RunBlockingError::from)?
}
