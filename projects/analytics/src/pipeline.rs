use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::agents::{
    code_writer::{CodeWriter, GenerateCodeError},
    executor::{render_output, run_code, ExecutionLimits},
    sanitizer::clean_code,
    table_selector::select_relevant_table,
    table_summarizer::summarize_all_tables,
};
use crate::db::{catalog::models::KnownTable, run_blocking, PgPool, RunBlockingError};

/// Everything one question produced, in the order the steps ran.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub query_id: Uuid,
    pub table: KnownTable,
    pub summary: String,
    pub code: String,
    pub output: String,
    pub chart_svg: Option<String>,
    pub row_count: usize,
    pub truncated: bool,
}

#[derive(Debug, Error)]
pub enum AnswerQuestionError {
    #[error("Question is empty")]
    EmptyQuestion,
    #[error("SummarizeTables: {source}")]
    SummarizeTables {
        #[from]
        source: RunBlockingError,
    },
    #[error("GenerateCode: {source}")]
    GenerateCode {
        #[from]
        source: GenerateCodeError,
    },
}

pub async fn answer_question(
    pool: &PgPool,
    writer: &CodeWriter,
    limits: ExecutionLimits,
    question: &str,
) -> Result<QueryOutcome, AnswerQuestionError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AnswerQuestionError::EmptyQuestion);
    }

    let query_id = Uuid::new_v4();
    let span = info_span!("answer_question", %query_id);

    async move {
        let summaries =
            run_blocking(pool, |conn| Ok::<_, RunBlockingError>(summarize_all_tables(conn))).await?;

        let (table, summary) = select_relevant_table(question, &summaries);
        info!(%table, "table selected");

        let raw_code = writer.generate_code(&summary, question, table).await?;
        let code = clean_code(&raw_code);

        let title = question.to_string();
        let sql = code.clone();
        let output = render_output(
            run_blocking(pool, move |conn| run_code(conn, &sql, limits, &title)).await,
        );

        Ok(QueryOutcome {
            query_id,
            table,
            summary,
            code,
            output: output.text,
            chart_svg: output.chart_svg,
            row_count: output.row_count,
            truncated: output.truncated,
        })
    }
    .instrument(span)
    .await
}
