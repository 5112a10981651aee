//! GitHub repository analytics from natural-language questions
//!
//! - Question → table → LLM-written SQL → read-only execution, in `agents/` and `pipeline`
//! - PostgreSQL models and queries in `db/`
//! - REST API endpoints in `endpoints/`, wired up in `router`
//! - Requires OPENAI_API_KEY for questions and GITHUB_TOKEN for syncing

pub mod agents;
pub mod config;
pub mod context;
pub mod db;
pub mod endpoints;
pub mod pipeline;
pub mod router;
pub mod utils;
