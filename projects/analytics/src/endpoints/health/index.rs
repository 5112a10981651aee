use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::warn;

use crate::context::AppContext;
use crate::db::{readonly::queries::ping, run_blocking, RunBlockingError};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub database: String,
    pub code_writer: bool,
    pub github_token: bool,
}

#[derive(Debug, thiserror::Error)]
enum CheckDatabaseError {
    #[error(transparent)]
    RunBlocking {
        #[from]
        source: RunBlockingError,
    },
    #[error(transparent)]
    Ping {
        #[from]
        source: crate::db::readonly::queries::PingError,
    },
}

/// Axum handler: GET /health
pub async fn handler(Extension(ctx): Extension<AppContext>) -> impl IntoResponse {
    let database = run_blocking(&ctx.pool, |conn| Ok::<_, CheckDatabaseError>(ping(conn)?)).await;

    let (status_code, status, database) = match database {
        Ok(()) => (StatusCode::OK, "ok", "reachable".to_string()),
        Err(err) => {
            warn!(error = %err, "health check: database unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", err.to_string())
        }
    };

    let report = HealthReport {
        status,
        database,
        code_writer: ctx.code_writer.is_some(),
        github_token: ctx.config.github_token.is_some(),
    };

    (status_code, Json(report))
}
