use thiserror::Error;

const FENCE: &str = "```";

/// Strips markdown code fences and surrounding whitespace from an LLM reply,
/// along with any trailing semicolons.
pub fn clean_code(raw: &str) -> String {
    let code = raw
        .lines()
        .filter(|line| !is_fence_line(line))
        .map(|line| line.replace(FENCE, ""))
        .collect::<Vec<_>>()
        .join("\n");

    code.trim().trim_end_matches(';').trim_end().to_string()
}

// A fence on its own line, with or without a language tag (```sql, ```SQL, ```pgsql).
fn is_fence_line(line: &str) -> bool {
    line.trim()
        .strip_prefix(FENCE)
        .is_some_and(|tag| !tag.contains(char::is_whitespace))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckStatementError {
    #[error("Generated query is empty")]
    EmptyStatement,
    #[error("Generated query must start with SELECT or WITH, found `{keyword}`")]
    NotAQuery { keyword: String },
    #[error("Generated query contains more than one statement")]
    MultipleStatements,
}

/// Accepts a single SELECT/WITH statement as produced by [`clean_code`].
pub fn check_statement(sql: &str) -> Result<(), CheckStatementError> {
    let body = skip_leading_comments(sql);
    if body.is_empty() {
        return Err(CheckStatementError::EmptyStatement);
    }

    let keyword: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();
    if keyword != "SELECT" && keyword != "WITH" {
        let keyword = body.split_whitespace().next().unwrap_or_default().to_string();
        return Err(CheckStatementError::NotAQuery { keyword });
    }

    if has_statement_separator(body) {
        return Err(CheckStatementError::MultipleStatements);
    }

    Ok(())
}

fn skip_leading_comments(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(line_comment) = rest.strip_prefix("--") {
            rest = line_comment.split_once('\n').map(|(_, tail)| tail).unwrap_or("").trim_start();
        } else if let Some(block_comment) = rest.strip_prefix("/*") {
            rest = block_comment.split_once("*/").map(|(_, tail)| tail).unwrap_or("").trim_start();
        } else {
            return rest;
        }
    }
}

// Semicolons inside quotes and comments do not separate statements.
fn has_statement_separator(sql: &str) -> bool {
    #[derive(PartialEq)]
    enum Scan {
        Code,
        SingleQuoted,
        DoubleQuoted,
        LineComment,
        BlockComment,
    }

    let mut state = Scan::Code;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        state = match (state, c) {
            (Scan::Code, ';') => return true,
            (Scan::Code, '\'') => Scan::SingleQuoted,
            (Scan::Code, '"') => Scan::DoubleQuoted,
            (Scan::Code, '-') if chars.peek() == Some(&'-') => Scan::LineComment,
            (Scan::Code, '/') if chars.peek() == Some(&'*') => {
                chars.next();
                Scan::BlockComment
            }
            (Scan::SingleQuoted, '\'') => Scan::Code,
            (Scan::DoubleQuoted, '"') => Scan::Code,
            (Scan::LineComment, '\n') => Scan::Code,
            (Scan::BlockComment, '*') if chars.peek() == Some(&'/') => {
                chars.next();
                Scan::Code
            }
            (state, _) => state,
        };
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        sql_fence = { "```sql\nSELECT 1;\n```", "SELECT 1" },
        uppercase_tag = { "```SQL\nSELECT 1\n```", "SELECT 1" },
        pgsql_tag = { "```pgsql\nSELECT 1\n```", "SELECT 1" },
        inline_fence = { "```SELECT 1```", "SELECT 1" },
        python_fence = { "```python\nSELECT 1\n```", "SELECT 1" },
        bare_fence = { "```\nSELECT state FROM issues\n```\n", "SELECT state FROM issues" },
        no_fence = { "  SELECT 1  ", "SELECT 1" },
        several_semicolons = { "SELECT 1;;  ", "SELECT 1" }
    )]
    fn cleans_llm_reply(raw: &str, expected: &str) {
        assert_eq!(clean_code(raw), expected);
    }

    #[parameterized(
        select = { "SELECT count(*) FROM issues" },
        lowercase_with = { "with t as (select 1) select * from t" },
        leading_comment = { "-- per state\nSELECT state, count(*) FROM issues GROUP BY state" },
        quoted_semicolon = { "SELECT * FROM issues WHERE title LIKE '%;%'" }
    )]
    fn accepts_single_query(sql: &str) {
        assert_eq!(check_statement(sql), Ok(()));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(check_statement("  -- nothing here"), Err(CheckStatementError::EmptyStatement));
    }

    #[test]
    fn rejects_writes() {
        assert_eq!(
            check_statement("DELETE FROM issues"),
            Err(CheckStatementError::NotAQuery { keyword: "DELETE".to_string() })
        );
    }

    #[test]
    fn rejects_stacked_statements() {
        assert_eq!(
            check_statement("SELECT 1; DROP TABLE issues"),
            Err(CheckStatementError::MultipleStatements)
        );
    }

    #[test]
    fn rejects_selectish_prefix() {
        assert!(matches!(
            check_statement("SELECTED FROM x"),
            Err(CheckStatementError::NotAQuery { .. })
        ));
    }
}
