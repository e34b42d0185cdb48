//! Markdown table rendering.

use crate::model::{TableModel, TableRow};
use once_cell::sync::Lazy;
use regex::Regex;

static CELL_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n\x0B]+").expect("valid regex"));

/// Render a table as a markdown table.
///
/// The first row becomes the header and fixes the column count; shorter
/// rows are padded with empty cells and longer rows are truncated. A table
/// with no rows or an empty header renders as an empty string.
pub fn render_table(table: &TableModel) -> String {
    let columns = table.column_count();
    let Some(header) = table.header() else {
        return String::new();
    };
    if columns == 0 {
        return String::new();
    }

    let mut lines = Vec::with_capacity(table.row_count() + 1);
    lines.push(render_row(header, columns));
    lines.push(format!("|{}", " --- |".repeat(columns)));
    for row in table.body() {
        lines.push(render_row(row, columns));
    }
    lines.join("\n")
}

fn render_row(row: &TableRow, columns: usize) -> String {
    let mut line = String::from("|");
    for i in 0..columns {
        let text = row.cells.get(i).map(|c| c.display_text()).unwrap_or("");
        line.push(' ');
        line.push_str(&escape_cell(text));
        line.push_str(" |");
    }
    line
}

/// Clean a cell for single-line markdown output.
pub fn escape_cell(text: &str) -> String {
    CELL_BREAKS
        .replace_all(text.trim(), " ")
        .replace('|', "\\|")
}
