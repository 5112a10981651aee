use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::context::AppContext;
use crate::endpoints::{
    github::repo_data::sync::index::handler as github_repo_data_sync_handler,
    health::index::handler as health_handler,
    query::ask::index::handler as query_ask_handler,
    tables::summary::index::handler as tables_summary_handler,
};

pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/query/ask", post(query_ask_handler))
        .route("/tables/summary", get(tables_summary_handler))
        .route("/github/repo_data/sync", post(github_repo_data_sync_handler))
        .route("/health", get(health_handler))
        .layer(Extension(ctx))
}
