use crate::agents::table_summarizer::TableSummary;
use crate::db::catalog::models::KnownTable;

/// Per-table trigger words, checked in this order; first hit wins.
pub const TABLE_KEYWORDS: [(KnownTable, &[&str]); 3] = [
    (
        KnownTable::Issues,
        &["issue", "bug", "label", "assignee", "milestone", "comment", "closed", "open", "ticket"],
    ),
    (
        KnownTable::Commits,
        &["commit", "sha", "author", "committer", "parent", "push"],
    ),
    (
        KnownTable::RepoInfo,
        &["star", "fork", "watcher", "language", "repo", "description"],
    ),
];

pub const DEFAULT_TABLE: KnownTable = KnownTable::Issues;

pub fn select_table(question: &str) -> KnownTable {
    let question = question.to_lowercase();

    TABLE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| question.contains(keyword)))
        .map(|(table, _)| *table)
        .unwrap_or(DEFAULT_TABLE)
}

/// Picks the table for `question` and returns it with its summary text.
pub fn select_relevant_table(question: &str, summaries: &[TableSummary]) -> (KnownTable, String) {
    let table = select_table(question);
    let summary = summaries
        .iter()
        .find(|summary| summary.table == table)
        .map(|summary| summary.summary.clone())
        .unwrap_or_else(|| format!("Table {table} is EMPTY."));

    (table, summary)
}
