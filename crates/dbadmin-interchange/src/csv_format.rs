//! Plain comma-separated text, without quoting
//!
//! Cells are joined with `,` and written as-is; a cell that itself contains a
//! comma or line break does not survive a round trip.

use dbadmin_core::TabularResult;

const FIELD_DELIMITER: char = ',';

/// Render a result as CSV: one header line from `columns`, then one line per row.
/// Every line, including the last, ends with `\n`.
pub fn render_csv(result: &TabularResult) -> String {
    let mut out = String::new();

    push_line(&mut out, &result.columns);
    for row in &result.rows {
        push_line(&mut out, row);
    }

    out
}

fn push_line(out: &mut String, cells: &[String]) {
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            out.push(FIELD_DELIMITER);
        }
        out.push_str(cell);
    }
    out.push('\n');
}
