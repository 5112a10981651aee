use serde_json::Value;

use crate::db::readonly::queries::JsonRows;

const MAX_CELL_WIDTH: usize = 48;

/// Plain-text rendering of a query result, one aligned row per line with a row-count footer.
pub fn render_text_table(result: &JsonRows) -> String {
    if result.columns.is_empty() {
        return footer(result.rows.len(), result.truncated);
    }

    let cells: Vec<Vec<(String, bool)>> = result
        .rows
        .iter()
        .map(|row| {
            (0..result.columns.len())
                .map(|index| format_cell(row.get(index).unwrap_or(&Value::Null)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].0.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 3);
    lines.push(
        result
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| format!("{column:<width$}"))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    lines.push(widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>().join("-+-"));

    for row in &cells {
        lines.push(
            row.iter()
                .zip(&widths)
                .map(|((text, numeric), width)| {
                    if *numeric {
                        format!("{text:>width$}")
                    } else {
                        format!("{text:<width$}")
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string(),
        );
    }

    lines.push(footer(cells.len(), result.truncated));

    lines.join("\n")
}

fn footer(count: usize, truncated: bool) -> String {
    let noun = if count == 1 { "row" } else { "rows" };
    if truncated {
        format!("({count} {noun}, truncated)")
    } else {
        format!("({count} {noun})")
    }
}

// Returns the display text and whether it should be right-aligned.
fn format_cell(value: &Value) -> (String, bool) {
    let (text, numeric) = match value {
        Value::Null => ("NULL".to_string(), false),
        Value::Number(number) => (number.to_string(), true),
        Value::Bool(flag) => (flag.to_string(), false),
        Value::String(text) => (text.replace(['\n', '\r', '\t'], " "), false),
        other => (other.to_string(), false),
    };

    (truncate(&text), numeric)
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }

    let kept: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(columns: &[&str], rows: Vec<Vec<Value>>, truncated: bool) -> JsonRows {
        JsonRows {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            truncated,
        }
    }

    #[test]
    fn renders_aligned_columns() {
        let table = render_text_table(&result(
            &["state", "total"],
            vec![vec![json!("open"), json!(3)], vec![json!("closed"), json!(12)]],
            false,
        ));

        assert_eq!(
            table,
            "state  | total\n\
             -------+------\n\
             open   |     3\n\
             closed |    12\n\
             (2 rows)"
        );
    }

    #[test]
    fn nulls_and_truncation_are_marked() {
        let table = render_text_table(&result(&["milestone"], vec![vec![Value::Null]], true));

        assert!(table.contains("NULL"));
        assert!(table.ends_with("(1 row, truncated)"));
    }

    #[test]
    fn long_text_is_shortened() {
        let long = "x".repeat(100);
        let table = render_text_table(&result(&["body"], vec![vec![json!(long)]], false));

        let row = table.lines().nth(2).unwrap();
        assert_eq!(row.chars().count(), MAX_CELL_WIDTH);
        assert!(row.ends_with('…'));
    }

    #[test]
    fn repeated_column_names_are_separate_columns() {
        let table = render_text_table(&result(&["n", "n"], vec![vec![json!(1), json!(2)]], false));

        assert_eq!(table.lines().nth(2), Some("1 | 2"));
    }

    #[test]
    fn empty_result_keeps_header() {
        let table = render_text_table(&result(&["state", "total"], vec![], false));

        assert_eq!(table, "state | total\n------+------\n(0 rows)");
    }

    #[test]
    fn no_columns() {
        assert_eq!(render_text_table(&JsonRows::default()), "(0 rows)");
    }
}
