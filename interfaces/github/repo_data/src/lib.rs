//! Thin client for the GitHub REST endpoints the analytics dataset is built from:
//! repository issues, commits and metadata.

pub mod index;
pub mod types;
