//! Tabular rows: the shape every tab lists, searches and renders.

use serde::Serialize;

/// A row shown in one of the tab tables
pub trait TableRow: Serialize {
    /// Column headings, in display order
    const COLUMNS: &'static [&'static str];

    /// Displayed cell values, one per column
    fn cells(&self) -> Vec<String>;

    /// Case-insensitive substring match against any displayed cell.
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .cells()
                .iter()
                .any(|cell| cell.to_lowercase().contains(needle))
    }
}

/// Keep the rows matching `term`. A blank term keeps everything.
pub fn search<R: TableRow>(rows: Vec<R>, term: &str) -> Vec<R> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter().filter(|row| row.matches(&needle)).collect()
}

/// Render rows as an aligned plain-text table
pub fn render<R: TableRow>(rows: &[R]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();

    let mut widths: Vec<usize> = R::COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, R::COLUMNS.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Dollar amount with two decimals, e.g. `$148.50`
pub fn format_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}
