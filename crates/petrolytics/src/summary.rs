//! The tabular summarizer: per-column top-5 frequency tables.

use indexmap::IndexMap;

use crate::model::{Column, ColumnSummary, Dataset, Value};

/// Maximum number of ranked values kept per column.
pub const TOP_VALUES: usize = 5;

/// Summarizes every column of a dataset, preserving column order.
///
/// Each summary holds at most [`TOP_VALUES`] `(value, count)` pairs sorted
/// descending by occurrence count; a full tie in count keeps the values in
/// first-occurrence order.  Empty columns and zero-row datasets produce
/// summaries with empty value lists rather than errors.
pub fn summarize_dataset(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset.columns().iter().map(summarize_column).collect()
}

/// Summarizes a single column.
///
/// Values are compared by their stringified form; missing cells are not
/// counted.
pub fn summarize_column(column: &Column) -> ColumnSummary {
    ColumnSummary::new(column.name(), top_values(column.values()))
}

fn top_values(values: &[Value]) -> Vec<(String, usize)> {
    // IndexMap keeps first-seen insertion order, which the stable sort
    // below preserves among equal counts.
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        if value.is_null() {
            continue;
        }
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_VALUES);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dataset, Value};

    fn text(s: &str) -> Value {
        Value::Text(s.to_owned())
    }

    #[test]
    fn one_summary_per_column_in_order() {
        let ds = Dataset::new("wells.csv")
            .with_column("field", vec![text("Ghawar"), text("Burgan")])
            .with_column("basin", vec![text("Permian")])
            .with_column("status", vec![]);

        let summaries = summarize_dataset(&ds);
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].column(), "field");
        assert_eq!(summaries[1].column(), "basin");
        assert_eq!(summaries[2].column(), "status");
        assert!(summaries[2].top_values().is_empty());
    }

    #[test]
    fn counts_descend_and_cap_at_five() {
        let mut values = Vec::new();
        for (name, n) in [("a", 6), ("b", 5), ("c", 4), ("d", 3), ("e", 2), ("f", 1)] {
            values.extend(std::iter::repeat_with(|| text(name)).take(n));
        }
        let summary = summarize_column(&Column::new("col", values));

        let counts: Vec<usize> = summary.top_values().iter().map(|(_, c)| *c).collect();
        assert_eq!(counts, vec![6, 5, 4, 3, 2]);
        assert!(summary.top_values().iter().all(|(v, _)| v != "f"));
    }

    #[test]
    fn full_ties_keep_first_seen_order() {
        let values = vec![text("zeta"), text("alpha"), text("mid"), text("alpha")];
        let summary = summarize_column(&Column::new("col", values));

        let names: Vec<&str> = summary
            .top_values()
            .iter()
            .map(|(v, _)| v.as_str())
            .collect();
        // "alpha" has count 2; "zeta" and "mid" tie at 1 in first-seen order.
        assert_eq!(names, vec!["alpha", "zeta", "mid"]);
    }

    #[test]
    fn mixed_types_count_by_stringified_equality() {
        let values = vec![Value::Int(3), text("3"), Value::Float(2.5)];
        let summary = summarize_column(&Column::new("col", values));
        assert_eq!(summary.top_values()[0], ("3".to_owned(), 2));
        assert_eq!(summary.top_values()[1], ("2.5".to_owned(), 1));
    }

    #[test]
    fn zero_row_dataset_yields_empty_summaries() {
        let ds = Dataset::new("empty.csv")
            .with_column("x", vec![])
            .with_column("y", vec![]);
        let summaries = summarize_dataset(&ds);
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.top_values().is_empty()));
    }

    #[test]
    fn nulls_are_not_counted() {
        let values = vec![Value::Null, text("x"), Value::Null];
        let summary = summarize_column(&Column::new("col", values));
        assert_eq!(summary.top_values(), &[("x".to_owned(), 1)]);
    }
}
