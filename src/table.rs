//! In-memory table of dataset rows
//!
//! A [`Table`] is an ordered list of column names plus an ordered list of
//! [`Record`]s. Cells are kept as text exactly as they were read; a missing
//! cell is `None`. Numeric columns are parsed on demand, so a column is only
//! required to be numeric when something sorts or sizes by it.

use crate::error::{Error, Result};
use std::cmp::Ordering;

/// One row of the dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    cells: Vec<Option<String>>,
}

impl Record {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Text of the cell at `index`, `None` if missing
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn is_missing(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Option<String>] {
        &mut self.cells
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    /// Build a table; every record must have one cell per column.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        for (row, record) in records.iter().enumerate() {
            if record.cells.len() != columns.len() {
                return Err(Error::Parse(format!(
                    "row {} has {} fields, expected {}",
                    row + 1,
                    record.cells.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Same columns, rows taken from this table
    pub(crate) fn with_records(&self, records: Vec<Record>) -> Table {
        Table {
            columns: self.columns.clone(),
            records,
        }
    }

    pub(crate) fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Index of `column`, or a validation error naming it.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| Error::validation(column, "column not found in dataset"))
    }

    /// Text values of a column in row order
    pub fn column_values(&self, column: &str) -> Result<Vec<Option<&str>>> {
        let index = self.require_column(column)?;
        Ok(self.records.iter().map(|r| r.get(index)).collect())
    }

    /// Numeric values of a column in row order. Missing cells are `None`;
    /// a present cell that is not a finite number is an error.
    pub fn numeric_values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        let index = self.require_column(column)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, record)| match record.get(index) {
                None => Ok(None),
                Some(text) => parse_number(text).map(Some).ok_or_else(|| {
                    Error::validation(
                        column,
                        format!("row {}: '{}' is not a number", row + 1, text),
                    )
                }),
            })
            .collect()
    }

    /// Stable sort, largest value of `column` first. Rows with a missing
    /// value keep their relative order after every valued row.
    pub fn sort_descending_by(&mut self, column: &str) -> Result<()> {
        let keys = self.numeric_values(column)?;

        let mut keyed: Vec<(Option<f64>, Record)> =
            keys.into_iter().zip(std::mem::take(&mut self.records)).collect();

        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        self.records = keyed.into_iter().map(|(_, r)| r).collect();
        Ok(())
    }
}

/// Parse a numeric cell. Only finite values count as numbers.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
