//! Fixed-width text tables for chat replies.
//!
//! ```text
//! | Amount | Category  |
//! |--------|-----------|
//! | 12.50  | Food      |
//! | 5      | Transport |
//! ```
//!
//! Cells are left-aligned. A column is as wide as its longest cell (header
//! included), measured in characters of the cell's text form.

use crate::error::TableError;
use crate::value::Value;

/// A header row plus body rows of equal width.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column labels.
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|s| s.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table and append every row, failing on the first row whose
    /// width differs from the header.
    pub fn from_rows<S: AsRef<str>>(
        header: &[S],
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new(header);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a body row. The table is unchanged if the row is rejected.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.header.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-column rendering widths.
    pub fn widths(&self) -> Vec<usize> {
        let body = self.text_rows();
        column_widths(&self.header, &body)
    }

    /// Render the table. Every line, including the last, ends with `\n`.
    pub fn render(&self) -> String {
        let body = self.text_rows();
        let widths = column_widths(&self.header, &body);

        let mut out = String::new();
        push_line(&mut out, &self.header, &widths);
        for width in &widths {
            out.push('|');
            out.push_str(&"-".repeat(width + 2));
        }
        out.push_str("|\n");
        for row in &body {
            push_line(&mut out, row, &widths);
        }
        out
    }

    /// Render inside a fenced code block so chat clients keep the alignment.
    pub fn render_code_block(&self) -> String {
        format!("```\n{}```", self.render())
    }

    fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }
}

/// Render `header` and `rows` in one call.
pub fn render<S: AsRef<str>>(
    header: &[S],
    rows: impl IntoIterator<Item = Vec<Value>>,
) -> Result<String, TableError> {
    Table::from_rows(header, rows).map(|t| t.render())
}

fn text_len(s: &str) -> usize {
    s.chars().count()
}

fn column_widths(header: &[String], body: &[Vec<String>]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            body.iter()
                .map(|row| text_len(&row[idx]))
                .chain(std::iter::once(text_len(label)))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    for (cell, width) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        out.push_str("| ");
        out.push_str(cell);
        out.push_str(&" ".repeat(width - text_len(cell) + 1));
    }
    out.push_str("|\n");
}
