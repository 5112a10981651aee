use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

use crate::agents::executor::ExecutionLimits;
use crate::context::AppContext;
use crate::pipeline::{answer_question, AnswerQuestionError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Code generation is unavailable: OPENAI_API_KEY not set")]
    CodeWriterUnavailable,
    #[error(transparent)]
    AnswerQuestion {
        #[from]
        source: AnswerQuestionError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::CodeWriterUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            HandlerError::AnswerQuestion { source } => match source {
                AnswerQuestionError::EmptyQuestion => StatusCode::BAD_REQUEST,
                AnswerQuestionError::SummarizeTables { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                AnswerQuestionError::GenerateCode { .. } => StatusCode::BAD_GATEWAY,
            },
        };

        (status, self.to_string()).into_response()
    }
}

/// JSON payload expected by the endpoint.
#[derive(Deserialize)]
pub struct AskRequestBody {
    question: String,
}

/// Axum handler: POST /query/ask
pub async fn handler(
    Extension(ctx): Extension<AppContext>,
    Json(input): Json<AskRequestBody>,
) -> Result<impl IntoResponse, HandlerError> {
    if input.question.trim().is_empty() {
        return Err(AnswerQuestionError::EmptyQuestion.into());
    }

    let writer = ctx.code_writer.as_ref().ok_or(HandlerError::CodeWriterUnavailable)?;
    let limits = ExecutionLimits::from(ctx.config.as_ref());

    let outcome = answer_question(&ctx.pool, writer, limits, &input.question).await?;

    Ok((StatusCode::OK, Json(outcome)))
}
