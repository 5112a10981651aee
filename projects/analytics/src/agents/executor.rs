use diesel::PgConnection;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::agents::sanitizer::{check_statement, CheckStatementError};
use crate::config::AppConfig;
use crate::db::readonly::queries::{run_readonly_query, JsonRows, RunReadonlyQueryError};
use crate::db::RunBlockingError;
use crate::utils::chart::{generate_result_chart, ChartConfig};
use crate::utils::result_shape::extract_chart_data;
use crate::utils::text_table::render_text_table;

#[derive(Debug, Clone, Copy)]
pub struct ExecutionLimits {
    pub row_limit: usize,
    pub statement_timeout_ms: u64,
}

impl From<&AppConfig> for ExecutionLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            row_limit: config.query_row_limit,
            statement_timeout_ms: config.statement_timeout_ms,
        }
    }
}

/// What a run produced: the printed table and, when the rows allow it, an SVG chart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionOutput {
    pub text: String,
    pub chart_svg: Option<String>,
    pub row_count: usize,
    pub truncated: bool,
}

#[derive(Debug, Error)]
pub enum RunCodeError {
    #[error("UnsafeStatement: {source}")]
    UnsafeStatement {
        #[from]
        source: CheckStatementError,
    },
    #[error(transparent)]
    RunReadonlyQuery {
        #[from]
        source: RunReadonlyQueryError,
    },
    #[error(transparent)]
    Blocking {
        #[from]
        source: RunBlockingError,
    },
}

pub fn run_code(
    conn: &mut PgConnection,
    code: &str,
    limits: ExecutionLimits,
    title: &str,
) -> Result<ExecutionOutput, RunCodeError> {
    check_statement(code)?;

    let result = run_readonly_query(conn, code, limits.row_limit, limits.statement_timeout_ms)?;
    info!(rows = result.rows.len(), truncated = result.truncated, "generated query executed");

    Ok(output_from_rows(&result, title))
}

/// Builds the printable output for a result set. Chart failures only drop the chart.
pub fn output_from_rows(result: &JsonRows, title: &str) -> ExecutionOutput {
    let chart_svg = extract_chart_data(result).and_then(|data| {
        let config = ChartConfig { title: title.to_string(), ..ChartConfig::default() };
        generate_result_chart(&data, &config)
            .map_err(|err| warn!(error = %err, "chart rendering failed"))
            .ok()
    });

    ExecutionOutput {
        text: render_text_table(result),
        chart_svg,
        row_count: result.rows.len(),
        truncated: result.truncated,
    }
}

/// Folds a failed run into its printed form.
pub fn render_output(result: Result<ExecutionOutput, RunCodeError>) -> ExecutionOutput {
    match result {
        Ok(output) => output,
        Err(err) => {
            warn!(error = %err, "generated query failed");
            ExecutionOutput {
                text: format!("Error executing query: {err}"),
                ..ExecutionOutput::default()
            }
        }
    }
}
