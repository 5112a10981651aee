use std::time::Duration;

use interfaces_openai_chat_completions::index::{
    create_chat_completion, parse_completion_content, ChatCompletionRequest, ChatMessage,
    CreateChatCompletionError, ParseChatCompletionError,
};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::db::catalog::models::KnownTable;

/// Turns a question plus a table summary into SQL through a chat-completion model.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Error)]
pub enum BuildCodeWriterError {
    #[error("OPENAI_API_KEY not set in environment variables")]
    MissingApiKey,
    #[error("BuildHttpClient: {source}")]
    BuildHttpClient {
        #[from]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerateCodeError {
    #[error("CreateChatCompletion: {source}")]
    CreateChatCompletion {
        #[from]
        source: CreateChatCompletionError,
    },
    #[error("ParseChatCompletion: {source}")]
    ParseChatCompletion {
        #[from]
        source: ParseChatCompletionError,
    },
}

pub fn build_prompt(table: KnownTable, summary: &str, question: &str) -> String {
    format!(
        r#"
You have access to a PostgreSQL table '{table}' (schema public) with summary:
{summary}

Write a single read-only PostgreSQL query to answer the following user query: "{question}".
Requirements:
1. Reads only from the table '{table}'.
2. Produces tabular output. For trends or comparisons, put the label or date column first, followed by numeric columns, so the result can be charted.
3. Output ONLY the SQL query.
"#
    )
}

impl CodeWriter {
    pub fn from_config(config: &AppConfig) -> Result<Self, BuildCodeWriterError> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or(BuildCodeWriterError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.openai_base_url.clone(),
            api_key,
            model: config.openai_model.clone(),
            temperature: config.llm_temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_code(
        &self,
        summary: &str,
        question: &str,
        table: KnownTable,
    ) -> Result<String, GenerateCodeError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(build_prompt(table, summary, question))],
            temperature: Some(self.temperature),
        };

        debug!(model = %self.model, %table, "requesting generated query");

        let result =
            create_chat_completion(&self.client, &self.api_base, &self.api_key, &request).await?;

        Ok(parse_completion_content(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_table_summary_and_question() {
        let prompt = build_prompt(
            KnownTable::Commits,
            "Rows=3, Cols=2, Columns=['sha', 'author']",
            "Who commits the most?",
        );

        assert!(prompt.contains("table 'commits'"));
        assert!(prompt.contains("Columns=['sha', 'author']"));
        assert!(prompt.contains("user query: \"Who commits the most?\""));
        assert!(prompt.contains("Output ONLY the SQL query."));
    }

    #[test]
    fn missing_api_key_is_reported() {
        let config = AppConfig::from_lookup(|_| None).unwrap();

        assert!(matches!(
            CodeWriter::from_config(&config),
            Err(BuildCodeWriterError::MissingApiKey)
        ));
    }

    #[test]
    fn writer_uses_configured_model() {
        let config = AppConfig::from_lookup(|name| match name {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "OPENAI_MODEL" => Some("gpt-4.1-mini".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(CodeWriter::from_config(&config).unwrap().model(), "gpt-4.1-mini");
    }
}
