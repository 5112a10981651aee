use diesel::PgConnection;
use serde::Serialize;
use tracing::warn;

use crate::db::catalog::{
    models::KnownTable,
    queries::{count_table_rows, get_table_columns},
};

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub table: KnownTable,
    pub row_count: i64,
    pub columns: Vec<String>,
    pub summary: String,
}

/// One-line description of a table, as shown to the code writer.
pub fn format_summary(table: KnownTable, row_count: i64, columns: &[String]) -> String {
    if row_count == 0 {
        return format!("Table {table} is EMPTY.");
    }

    let quoted = columns
        .iter()
        .map(|column| format!("'{column}'"))
        .collect::<Vec<_>>()
        .join(", ");

    format!("Rows={row_count}, Cols={}, Columns=[{quoted}]", columns.len())
}

/// Read failures are folded into the summary text rather than returned.
pub fn summarize_table(conn: &mut PgConnection, table: KnownTable) -> TableSummary {
    let read = count_table_rows(conn, table)
        .map_err(|err| err.to_string())
        .and_then(|row_count| {
            get_table_columns(conn, table)
                .map(|columns| (row_count, columns))
                .map_err(|err| err.to_string())
        });

    match read {
        Ok((row_count, columns)) => TableSummary {
            table,
            row_count,
            summary: format_summary(table, row_count, &columns),
            columns,
        },
        Err(err) => {
            warn!(%table, error = %err, "failed to summarize table");
            TableSummary {
                table,
                row_count: 0,
                columns: Vec::new(),
                summary: format!("Error reading {table}: {err}"),
            }
        }
    }
}

pub fn summarize_all_tables(conn: &mut PgConnection) -> Vec<TableSummary> {
    KnownTable::ALL
        .into_iter()
        .map(|table| summarize_table(conn, table))
        .collect()
}
