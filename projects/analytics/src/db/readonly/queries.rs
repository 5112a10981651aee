use diesel::{prelude::*, sql_query, sql_types::Text};
use serde_json::Value;
use thiserror::Error;

// Leading column of every wrapped row: the row's position, or NULL on the
// single padding row returned for an empty result.
const ROW_NUMBER_COLUMN: &str = "generated row number";

#[derive(Debug, QueryableByName)]
struct JsonRow {
    #[diesel(sql_type = Text)]
    row: String,
}

/// Rows of an arbitrary query. Cells are positional, so repeated column
/// names each keep their own value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub truncated: bool,
}

#[derive(Debug, Error)]
pub enum RunReadonlyQueryError {
    #[error("RunReadonlyQuery: {source}")]
    RunReadonlyQuery {
        #[from]
        source: diesel::result::Error,
    },
    #[error("DecodeRow: {source}")]
    DecodeRow {
        #[from]
        source: serde_json::Error,
    },
    #[error("DecodeRow: row has no row number cell")]
    MissingRowNumber,
}

/// Runs `sql` in a read-only transaction bounded by `statement_timeout_ms`,
/// keeping at most `row_limit` rows.
///
/// `sql` must be a single SELECT/WITH statement without a trailing semicolon;
/// it is embedded as a subquery.
pub fn run_readonly_query(
    conn: &mut PgConnection,
    sql: &str,
    row_limit: usize,
    statement_timeout_ms: u64,
) -> Result<JsonRows, RunReadonlyQueryError> {
    let raw_rows = conn.build_transaction().read_only().run(|conn| {
        // 0 would disable the timeout in Postgres.
        let timeout_ms = statement_timeout_ms.max(1);
        sql_query(format!("SET LOCAL statement_timeout = {timeout_ms}")).execute(conn)?;

        // Postgres LIMIT is a bigint.
        let fetch_limit = row_limit.saturating_add(1).min(i64::MAX as usize);
        sql_query(wrap_query(sql, fetch_limit)).load::<JsonRow>(conn)
    })?;

    decode_rows(raw_rows.iter().map(|raw| raw.row.as_str()), row_limit)
}

// Each row comes back as `[[name, value], ...]` in select-list order. The
// LEFT JOIN against a one-row anchor yields an all-NULL row when the query
// is empty, which still carries the column names.
fn wrap_query(sql: &str, fetch_limit: usize) -> String {
    format!(
        "SELECT (\
            SELECT json_agg(json_build_array(cell.key, cell.value) ORDER BY cell.ordinal) \
            FROM json_each(row_to_json(padded)) WITH ORDINALITY AS cell(key, value, ordinal)\
         )::text AS row \
         FROM (\
            SELECT limited.* FROM (SELECT 1) AS anchor \
            LEFT JOIN (\
                SELECT row_number() OVER () AS \"{ROW_NUMBER_COLUMN}\", generated.* \
                FROM ({sql}\n) AS generated \
                LIMIT {fetch_limit}\
            ) AS limited ON true\
         ) AS padded \
         ORDER BY padded.\"{ROW_NUMBER_COLUMN}\""
    )
}

fn decode_rows<'a, I>(raw_rows: I, row_limit: usize) -> Result<JsonRows, RunReadonlyQueryError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut result = JsonRows::default();

    for (index, raw) in raw_rows.into_iter().enumerate() {
        let mut cells = serde_json::from_str::<Vec<(String, Value)>>(raw)?.into_iter();
        let (_, row_number) = cells.next().ok_or(RunReadonlyQueryError::MissingRowNumber)?;
        let (names, values): (Vec<String>, Vec<Value>) = cells.unzip();

        if index == 0 {
            result.columns = names;
        }
        if row_number.is_null() {
            continue;
        }
        if result.rows.len() == row_limit {
            result.truncated = true;
            break;
        }
        result.rows.push(values);
    }

    Ok(result)
}

#[derive(Debug, Error)]
pub enum PingError {
    #[error("Ping: {source}")]
    Ping {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn ping(conn: &mut PgConnection) -> Result<(), PingError> {
    sql_query("SELECT 1")
        .execute(conn)
        .map(|_| ())
        .map_err(|source| PingError::Ping { source })
}
