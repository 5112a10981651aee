use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use thiserror::Error;

use crate::agents::table_summarizer::{summarize_all_tables, TableSummary};
use crate::context::AppContext;
use crate::db::{run_blocking, RunBlockingError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    RunBlocking {
        #[from]
        source: RunBlockingError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Axum handler: GET /tables/summary
pub async fn handler(
    Extension(ctx): Extension<AppContext>,
) -> Result<impl IntoResponse, HandlerError> {
    let summaries: Vec<TableSummary> =
        run_blocking(&ctx.pool, |conn| Ok::<_, HandlerError>(summarize_all_tables(conn))).await?;

    Ok((StatusCode::OK, Json(summaries)))
}
