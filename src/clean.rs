//! Missing-value imputation and duplicate detection

use crate::table::{Record, Table};
use std::collections::HashSet;

/// What [`forward_fill`] did to the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Cells that were filled from an earlier row
    pub filled: usize,
    /// Leading missing cells with no earlier value, per column name
    pub unresolved: Vec<(String, usize)>,
}

impl FillReport {
    pub fn unresolved_total(&self) -> usize {
        self.unresolved.iter().map(|(_, n)| n).sum()
    }
}

/// Replace each missing cell with the nearest preceding non-missing value in
/// the same column. Cells before a column's first value stay missing.
pub fn forward_fill(table: &mut Table) -> FillReport {
    let width = table.columns().len();
    let mut last: Vec<Option<String>> = vec![None; width];
    let mut leading = vec![0usize; width];
    let mut filled = 0;

    for record in table.records_mut() {
        for (col, cell) in record.cells_mut().iter_mut().enumerate() {
            match cell {
                Some(value) => last[col] = Some(value.clone()),
                None => match &last[col] {
                    Some(prev) => {
                        *cell = Some(prev.clone());
                        filled += 1;
                    }
                    None => leading[col] += 1,
                },
            }
        }
    }

    let unresolved = table
        .columns()
        .iter()
        .zip(leading)
        .filter(|(_, n)| *n > 0)
        .map(|(name, n)| (name.clone(), n))
        .collect();

    FillReport { filled, unresolved }
}

/// Copy of `table` keeping only the first occurrence of each exactly-equal row.
pub fn drop_duplicates(table: &Table) -> Table {
    let mut seen: HashSet<&Record> = HashSet::new();
    let records: Vec<Record> = table
        .records()
        .iter()
        .filter(|r| seen.insert(*r))
        .cloned()
        .collect();

    table.with_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(columns: &[&str], rows: &[&[Option<&str>]]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| Record::new(r.iter().map(|c| c.map(str::to_string)).collect()))
                .collect(),
        )
        .unwrap()
    }

    // ==========================================================================
    // FORWARD FILL
    // ==========================================================================

    #[test]
    fn test_fill_carries_previous_value() {
        // SCENARIO: row 3 is missing its continent, row 2 says "Asia"
        let mut t = table(
            &["Country", "Continent"],
            &[
                &[Some("France"), Some("Europe")],
                &[Some("China"), Some("Asia")],
                &[Some("India"), None],
            ],
        );

        let report = forward_fill(&mut t);

        assert_eq!(t.records()[2].get(1), Some("Asia"));
        assert_eq!(report.filled, 1);
        assert!(report.unresolved.is_empty());
    }

    #[test]
    fn test_fill_runs_of_missing_cells() {
        let mut t = table(
            &["Pop"],
            &[&[Some("10")], &[None], &[None], &[Some("20")], &[None]],
        );

        forward_fill(&mut t);

        let values: Vec<_> = t.column_values("Pop").unwrap();
        assert_eq!(
            values,
            vec![Some("10"), Some("10"), Some("10"), Some("20"), Some("20")]
        );
    }

    #[test]
    fn test_fill_leaves_leading_gaps() {
        let mut t = table(
            &["Country", "Continent"],
            &[
                &[Some("A"), None],
                &[Some("B"), None],
                &[Some("C"), Some("Asia")],
            ],
        );

        let report = forward_fill(&mut t);

        assert!(t.records()[0].is_missing(1));
        assert!(t.records()[1].is_missing(1));
        assert_eq!(report.unresolved, vec![("Continent".to_string(), 2)]);
        assert_eq!(report.unresolved_total(), 2);
    }

    #[test]
    fn test_fill_is_per_column() {
        let mut t = table(
            &["a", "b"],
            &[&[Some("x"), None], &[None, Some("y")], &[None, None]],
        );

        forward_fill(&mut t);

        assert_eq!(t.records()[1].get(0), Some("x"));
        assert_eq!(t.records()[0].get(1), None);
        assert_eq!(t.records()[2].get(0), Some("x"));
        assert_eq!(t.records()[2].get(1), Some("y"));
    }

    // ==========================================================================
    // DUPLICATES
    // ==========================================================================

    #[test]
    fn test_drop_duplicates_keeps_first_occurrence() {
        let t = table(
            &["Country", "Pop"],
            &[
                &[Some("A"), Some("1")],
                &[Some("B"), Some("2")],
                &[Some("A"), Some("1")],
                &[Some("A"), Some("3")],
            ],
        );

        let deduped = drop_duplicates(&t);

        assert_eq!(deduped.len(), 3);
        assert_eq!(t.len(), 4, "source table is not modified");
        assert_eq!(deduped.records()[2].get(1), Some("3"));
    }

    #[test]
    fn test_missing_cells_compare_equal_for_duplicates() {
        let t = table(&["a", "b"], &[&[Some("x"), None], &[Some("x"), None]]);

        assert_eq!(drop_duplicates(&t).len(), 1);
    }

    proptest! {
        #[test]
        fn prop_fill_uses_nearest_previous_value(cells in prop::collection::vec(prop::option::of("[a-c]"), 0..40)) {
            let records = cells.iter().map(|c| Record::new(vec![c.clone()])).collect();
            let mut t = Table::new(vec!["col".into()], records).unwrap();

            forward_fill(&mut t);

            for (i, original) in cells.iter().enumerate() {
                let expected = match original {
                    Some(v) => Some(v.clone()),
                    None => cells[..i].iter().rev().find_map(|c| c.clone()),
                };
                prop_assert_eq!(t.records()[i].get(0).map(str::to_string), expected);
            }
        }
    }
}
