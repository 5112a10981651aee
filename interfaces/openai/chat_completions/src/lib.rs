//! Chat-completion client for OpenAI-compatible endpoints (`/chat/completions`).

pub mod index;
