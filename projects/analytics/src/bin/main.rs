use axum::serve;
use diesel::PgConnection;
use projects_analytics::{
    config::{AppConfig, LoadConfigError},
    context::AppContext,
    db::{ensure_tables, run_blocking, EnsureTablesError, RunBlockingError},
    router::build_router,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("LoadConfig: {source}")]
    LoadConfig {
        #[from]
        source: LoadConfigError,
    },
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("EnsureTables: {source}")]
    EnsureTables {
        #[from]
        source: EnsureTablesError,
    },
    #[error("RunBlocking: {source}")]
    RunBlocking {
        #[from]
        source: RunBlockingError,
    },
    #[error("TcpListenerBind: {source}")]
    TcpListenerBind {
        #[source]
        source: std::io::Error,
    },
    #[error("Serve: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    utils_trace::init(&config.log_level).map_err(|source| MainError::TracingInit { source })?;

    let addr = config.bind_addr;
    let ctx = AppContext::new(config);

    run_blocking(&ctx.pool, |conn: &mut PgConnection| Ok::<_, MainError>(ensure_tables(conn)?))
        .await?;

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| MainError::TcpListenerBind { source })?;

    info!("Server running on addr: {}", addr);

    serve(listener, app)
        .await
        .map_err(|source| MainError::Serve { source })?;

    Ok(())
}
