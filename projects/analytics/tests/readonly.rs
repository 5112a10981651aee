//! Checks against a live Postgres. Each test returns early when `DATABASE_URL`
//! is not set.

use diesel::{prelude::*, sql_query, PgConnection};
use projects_analytics::{
    agents::{
        executor::{run_code, ExecutionLimits, RunCodeError},
        table_summarizer::summarize_all_tables,
    },
    db::{
        ensure_tables,
        readonly::queries::{run_readonly_query, RunReadonlyQueryError},
    },
};
use serde_json::json;

fn connect() -> Option<PgConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let mut conn = PgConnection::establish(&url).expect("DATABASE_URL is set but unreachable");
    ensure_tables(&mut conn).unwrap();
    Some(conn)
}

const LIMITS: ExecutionLimits = ExecutionLimits { row_limit: 10, statement_timeout_ms: 5_000 };

#[test]
fn writes_are_rejected() {
    let Some(mut conn) = connect() else { return };

    let err = run_readonly_query(&mut conn, "SELECT id FROM issues FOR UPDATE", 10, 5_000)
        .unwrap_err();

    assert!(matches!(err, RunReadonlyQueryError::RunReadonlyQuery { .. }));
    assert!(err.to_string().contains("read-only transaction"), "{err}");
}

#[test]
fn slow_queries_are_cancelled() {
    let Some(mut conn) = connect() else { return };

    let err = run_readonly_query(&mut conn, "SELECT pg_sleep(5)", 10, 50).unwrap_err();

    assert!(err.to_string().contains("statement timeout"), "{err}");
}

#[test]
fn zero_timeout_still_cancels() {
    let Some(mut conn) = connect() else { return };

    assert!(run_readonly_query(&mut conn, "SELECT pg_sleep(5)", 10, 0).is_err());
}

#[test]
fn rows_past_the_limit_are_truncated() {
    let Some(mut conn) = connect() else { return };

    let result =
        run_readonly_query(&mut conn, "SELECT generate_series(1, 5) AS n", 3, 5_000).unwrap();
    assert_eq!(result.columns, vec!["n"]);
    assert_eq!(result.rows, vec![vec![json!(1)], vec![json!(2)], vec![json!(3)]]);
    assert!(result.truncated);

    let exact =
        run_readonly_query(&mut conn, "SELECT generate_series(1, 5) AS n", 5, 5_000).unwrap();
    assert_eq!(exact.rows.len(), 5);
    assert!(!exact.truncated);
}

#[test]
fn huge_row_limit_does_not_overflow() {
    let Some(mut conn) = connect() else { return };

    let result = run_readonly_query(&mut conn, "SELECT 1 AS n", usize::MAX, 5_000).unwrap();

    assert_eq!(result.rows, vec![vec![json!(1)]]);
    assert!(!result.truncated);
}

#[test]
fn query_order_is_kept() {
    let Some(mut conn) = connect() else { return };

    let result =
        run_readonly_query(&mut conn, "SELECT n FROM generate_series(3, 1, -1) AS n", 10, 5_000)
            .unwrap();

    assert_eq!(result.rows, vec![vec![json!(3)], vec![json!(2)], vec![json!(1)]]);
}

#[test]
fn trailing_line_comment_is_closed() {
    let Some(mut conn) = connect() else { return };

    let result =
        run_readonly_query(&mut conn, "SELECT 1 AS one -- just one", 10, 5_000).unwrap();

    assert_eq!(result.rows, vec![vec![json!(1)]]);
}

#[test]
fn repeated_column_names_keep_every_value() {
    let Some(mut conn) = connect() else { return };

    let result =
        run_readonly_query(&mut conn, "SELECT 1 AS n, 2 AS n, 3 AS m", 10, 5_000).unwrap();

    assert_eq!(result.columns, vec!["n", "n", "m"]);
    assert_eq!(result.rows, vec![vec![json!(1), json!(2), json!(3)]]);
}

#[test]
fn empty_result_keeps_column_names() {
    let Some(mut conn) = connect() else { return };

    let result = run_readonly_query(
        &mut conn,
        "SELECT state, count(*) AS total FROM issues WHERE false GROUP BY state",
        10,
        5_000,
    )
    .unwrap();

    assert_eq!(result.columns, vec!["state", "total"]);
    assert!(result.rows.is_empty());
    assert!(!result.truncated);
}

#[test]
fn infinite_values_are_printed_without_chart() {
    let Some(mut conn) = connect() else { return };

    let output = run_code(
        &mut conn,
        "SELECT 'a' AS x, 'Infinity'::float8 AS y UNION ALL SELECT 'b', 3",
        LIMITS,
        "x vs y",
    )
    .unwrap();

    assert_eq!(output.row_count, 2);
    assert!(output.chart_svg.is_none());
    assert!(output.text.contains("Infinity"));
}

#[test]
fn unsafe_statement_never_reaches_the_database() {
    let Some(mut conn) = connect() else { return };

    let err = run_code(&mut conn, "DELETE FROM issues", LIMITS, "delete").unwrap_err();

    assert!(matches!(err, RunCodeError::UnsafeStatement { .. }));
}

#[test]
fn unreadable_tables_are_summarized_as_errors() {
    let Some(mut conn) = connect() else { return };

    conn.begin_test_transaction().unwrap();
    sql_query("CREATE SCHEMA summary_without_tables").execute(&mut conn).unwrap();
    sql_query("SET LOCAL search_path TO summary_without_tables").execute(&mut conn).unwrap();

    let summaries = summarize_all_tables(&mut conn);

    assert_eq!(summaries.len(), 3);
    assert!(summaries[0].summary.starts_with("Error reading issues: "), "{}", summaries[0].summary);
    assert_eq!(summaries[0].row_count, 0);
    assert!(summaries[0].columns.is_empty());
}
