use std::sync::Arc;

use reqwest::Client;
use tracing::warn;

use crate::agents::code_writer::CodeWriter;
use crate::config::AppConfig;
use crate::db::{build_pool, PgPool};

/// Shared handles passed to every handler through an `Extension` layer.
#[derive(Clone)]
pub struct AppContext {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub github: Client,
    /// `None` when no API key is configured; questions are refused then.
    pub code_writer: Option<CodeWriter>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let code_writer = match CodeWriter::from_config(&config) {
            Ok(writer) => Some(writer),
            Err(err) => {
                warn!(error = %err, "code writer disabled");
                None
            }
        };

        Self {
            pool: build_pool(&config.database_url),
            config: Arc::new(config),
            github: Client::new(),
            code_writer,
        }
    }
}
