use chrono::NaiveDate;
use serde_json::Value;

use crate::db::readonly::queries::JsonRows;

/// Bar charts with more categories than this only show the first ones.
pub const MAX_CATEGORIES: usize = 40;

/// Horizontal axis of a chartable result.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    Dates(Vec<NaiveDate>),
    Categories(Vec<String>),
}

impl XAxis {
    pub fn len(&self) -> usize {
        match self {
            XAxis::Dates(dates) => dates.len(),
            XAxis::Categories(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One numeric column, aligned with the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub x_name: String,
    pub x: XAxis,
    pub series: Vec<Series>,
}

/// Reads a chart out of a query result: the first column is the x axis
/// (dates when every value parses as one, labels otherwise) and every
/// other all-numeric column becomes a series. Returns `None` when nothing
/// is plottable.
pub fn extract_chart_data(result: &JsonRows) -> Option<ChartData> {
    if result.rows.is_empty() || result.columns.len() < 2 {
        return None;
    }

    let x_name = result.columns[0].clone();
    let labels = result
        .rows
        .iter()
        .map(|row| label_of(cell(row, 0)))
        .collect::<Option<Vec<String>>>()?;

    let series: Vec<Series> = (1..result.columns.len())
        .filter_map(|index| {
            let values = result
                .rows
                .iter()
                .map(|row| numeric_value(cell(row, index)))
                .collect::<Option<Vec<Option<f64>>>>()?;
            if values.iter().all(Option::is_none) {
                return None;
            }
            Some(Series {
                name: result.columns[index].clone(),
                values: values.into_iter().map(|value| value.unwrap_or(0.0)).collect(),
            })
        })
        .collect();

    if series.is_empty() {
        return None;
    }

    let dates = labels.iter().map(|label| parse_date(label)).collect::<Option<Vec<_>>>();

    match dates {
        Some(dates) => Some(sorted_by_date(x_name, dates, series)),
        None => {
            let keep = labels.len().min(MAX_CATEGORIES);
            Some(ChartData {
                x_name,
                x: XAxis::Categories(labels.into_iter().take(keep).collect()),
                series: series
                    .into_iter()
                    .map(|s| Series {
                        name: s.name,
                        values: s.values.into_iter().take(keep).collect(),
                    })
                    .collect(),
            })
        }
    }
}

fn cell(row: &[Value], index: usize) -> &Value {
    row.get(index).unwrap_or(&Value::Null)
}

fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

// `Some(None)` is a SQL NULL; `None` means the column is not numeric.
// `Infinity` and `NaN` (from float columns or text) cannot be plotted.
fn numeric_value(value: &Value) -> Option<Option<f64>> {
    let number = match value {
        Value::Null => return Some(None),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    number.filter(|number| number.is_finite()).map(Some)
}

/// Accepts `YYYY-MM-DD` and anything starting with it (timestamps).
pub fn parse_date(label: &str) -> Option<NaiveDate> {
    let prefix = label.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn sorted_by_date(x_name: String, dates: Vec<NaiveDate>, series: Vec<Series>) -> ChartData {
    let mut order: Vec<usize> = (0..dates.len()).collect();
    order.sort_by_key(|&index| dates[index]);

    ChartData {
        x_name,
        x: XAxis::Dates(order.iter().map(|&index| dates[index]).collect()),
        series: series
            .into_iter()
            .map(|s| Series {
                name: s.name,
                values: order.iter().map(|&index| s.values[index]).collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(columns: &[&str], values: Vec<Vec<Value>>) -> JsonRows {
        JsonRows {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: values,
            truncated: false,
        }
    }

    #[test]
    fn categories_with_counts() {
        let result = rows(
            &["state", "total"],
            vec![vec![json!("open"), json!(3)], vec![json!("closed"), json!(9)]],
        );

        let chart = extract_chart_data(&result).unwrap();
        assert_eq!(chart.x, XAxis::Categories(vec!["open".into(), "closed".into()]));
        assert_eq!(chart.series[0].values, vec![3.0, 9.0]);
    }

    #[test]
    fn dates_are_sorted_with_their_values() {
        let result = rows(
            &["day", "opened", "closed"],
            vec![
                vec![json!("2024-05-03T00:00:00"), json!(1), Value::Null],
                vec![json!("2024-05-01T00:00:00"), json!(4), json!(2)],
            ],
        );

        let chart = extract_chart_data(&result).unwrap();
        let first = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        match &chart.x {
            XAxis::Dates(dates) => assert_eq!(dates[0], first),
            other => panic!("expected dates, got {other:?}"),
        }
        assert_eq!(chart.series[0].values, vec![4.0, 1.0]);
        assert_eq!(chart.series[1].values, vec![2.0, 0.0]);
    }

    #[test]
    fn text_columns_are_not_series() {
        let result = rows(
            &["login", "title"],
            vec![vec![json!("alice"), json!("Crash")]],
        );

        assert!(extract_chart_data(&result).is_none());
    }

    #[test]
    fn single_column_is_not_chartable() {
        let result = rows(&["count"], vec![vec![json!(12)]]);

        assert!(extract_chart_data(&result).is_none());
    }

    #[test]
    fn null_label_is_not_chartable() {
        let result = rows(&["milestone", "n"], vec![vec![Value::Null, json!(2)]]);

        assert!(extract_chart_data(&result).is_none());
    }

    #[test]
    fn repeated_value_columns_become_separate_series() {
        let result = rows(
            &["state", "count", "count"],
            vec![vec![json!("open"), json!(3), json!(1)]],
        );

        let chart = extract_chart_data(&result).unwrap();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].values, vec![3.0]);
        assert_eq!(chart.series[1].values, vec![1.0]);
    }

    #[test]
    fn non_finite_values_are_not_series() {
        let result = rows(
            &["x", "y", "z"],
            vec![
                vec![json!("a"), json!("Infinity"), json!(1)],
                vec![json!("b"), json!(3), json!("NaN")],
            ],
        );

        assert!(extract_chart_data(&result).is_none());
    }

    #[test]
    fn parse_date_rejects_short_or_odd_labels() {
        assert!(parse_date("2024").is_none());
        assert!(parse_date("not-a-date-at-all").is_none());
        assert!(parse_date("2024-02-30").is_none());
    }
}
