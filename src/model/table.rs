//! Table types.

use serde::{Deserialize, Serialize};

/// A tabular grid handed over by the format reader.
///
/// The first row is the header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableModel {
    /// Rows in the table
    pub rows: Vec<TableRow>,
}

impl TableModel {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows of plain strings.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(TableRow::from_strings).collect(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on the header row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the header row.
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// Get body rows (everything after the header).
    pub fn body(&self) -> &[TableRow] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Check if any cell is covered by a merge.
    pub fn has_spanned_cells(&self) -> bool {
        self.rows.iter().flat_map(|r| &r.cells).any(|c| c.spanned)
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }
}

/// A table cell.
///
/// In JSON a cell is a string, `null` (a cell hidden by a merge), or an
/// object `{"text": ..., "spanned": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CellRepr")]
pub struct TableCell {
    /// Raw cell text
    pub text: String,

    /// Whether the cell is covered by a neighbouring merged cell
    pub spanned: bool,
}

impl TableCell {
    /// Create a cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spanned: false,
        }
    }

    /// Create a cell hidden by a merge.
    pub fn spanned() -> Self {
        Self {
            text: String::new(),
            spanned: true,
        }
    }

    /// Text to display; merged cells display as empty.
    pub fn display_text(&self) -> &str {
        if self.spanned {
            ""
        } else {
            &self.text
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Text(String),
    Full {
        #[serde(default)]
        text: String,
        #[serde(default)]
        spanned: bool,
    },
    Missing(()),
}

impl From<CellRepr> for TableCell {
    fn from(repr: CellRepr) -> Self {
        match repr {
            CellRepr::Text(text) => TableCell::text(text),
            CellRepr::Full { text, spanned } => TableCell { text, spanned },
            CellRepr::Missing(()) => TableCell::spanned(),
        }
    }
}
