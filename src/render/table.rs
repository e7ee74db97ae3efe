//! Box-drawn tabular renderer for table events.

use serde_json::{Map, Value as Json};
use unicode_width::UnicodeWidthStr;

const INDEX_HEADER: &str = "(index)";

/// Render rows under the given columns, with a leading index column.
pub fn render_table(columns: &[String], rows: &[Map<String, Json>]) -> String {
    let mut header = vec![INDEX_HEADER.to_string()];
    header.extend(columns.iter().cloned());

    let body: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![i.to_string()];
            cells.extend(columns.iter().map(|col| row.get(col).map(cell).unwrap_or_default()));
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|c| {
            body.iter()
                .map(|r| r[c].width())
                .chain(std::iter::once(header[c].width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&border(&widths, '┌', '┬', '┐'));
    out.push_str(&line(&header, &widths));
    out.push_str(&border(&widths, '├', '┼', '┤'));
    for row in &body {
        out.push_str(&line(row, &widths));
    }
    out.push_str(&border(&widths, '└', '┴', '┘'));
    out
}

/// Strings print bare, everything else as compact JSON.
fn cell(value: &Json) -> String {
    match value {
        Json::String(s) => s.replace('\n', " "),
        other => other.to_string(),
    }
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&mid.to_string()))
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(text, w)| format!(" {}{} ", text, " ".repeat(w - text.width())))
        .collect();
    format!("│{}│\n", padded.join("│"))
}
