//! The question-answering loop, one step per module:
//! summarize tables, pick one, ask the LLM for SQL, clean it, run it.

pub mod code_writer;
pub mod executor;
pub mod sanitizer;
pub mod table_selector;
pub mod table_summarizer;
