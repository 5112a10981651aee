use std::fmt;

use serde::Serialize;

/// Tables of the analytics dataset, in routing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownTable {
    Issues,
    Commits,
    RepoInfo,
}

impl KnownTable {
    pub const ALL: [KnownTable; 3] =
        [KnownTable::Issues, KnownTable::Commits, KnownTable::RepoInfo];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownTable::Issues => "issues",
            KnownTable::Commits => "commits",
            KnownTable::RepoInfo => "repo_info",
        }
    }
}

impl fmt::Display for KnownTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, diesel::QueryableByName)]
pub struct ColumnName {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub column_name: String,
}
