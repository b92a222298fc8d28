use crate::model::{Extraction, ParsedTable};

/// Render an extraction for a terminal
pub fn render_text(extraction: &Extraction) -> String {
    match extraction {
        Extraction::Table(table) => {
            format!("Nutritional information:\n\n{}", render_table(table))
        }
        Extraction::Text(text) => format!("Results:\n\n{}", text),
    }
}

/// Render an extraction as JSON: `{"table": {...}}` or `{"text": "..."}`
pub fn render_json(extraction: &Extraction) -> Result<String, serde_json::Error> {
    let value = match extraction {
        Extraction::Table(table) => serde_json::json!({ "table": table }),
        Extraction::Text(text) => serde_json::json!({ "text": text }),
    };
    serde_json::to_string_pretty(&value)
}

/// Lay out a table with columns padded to their widest cell.
/// Cells a row does not have are left blank.
pub fn render_table(table: &ParsedTable) -> String {
    let cells: Vec<Vec<&str>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .headers
                .iter()
                .map(|header| row.get(header).map(String::as_str).unwrap_or(""))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(3)
        })
        .collect();

    let mut out = String::new();
    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    push_line(&mut out, &headers, &widths);

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let separator: Vec<&str> = separator.iter().map(String::as_str).collect();
    push_line(&mut out, &separator, &widths);

    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width.saturating_sub(cell.chars().count());
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(padding));
        out.push_str(" |");
    }
    out.push('\n');
}
