//! Nutrition table extraction from free-form model replies.
//!
//! Extraction runs in two stages. A line scan finds the first line that
//! opens with [`HEADER_MARKER`]; the table then runs from that marker up to
//! the last pipe in the reply, since the instruction asks the model to end
//! its answer with the table. The line parser turns that span into headers
//! and rows.
//!
//! Nothing here fails: a reply with no table comes back unchanged as
//! [`Extraction::Text`], and ragged rows are paired up to the shorter side.

use log::debug;
use std::collections::HashMap;

use crate::model::{Extraction, ParsedTable, TextBearing};

/// Literal start of the table header the instruction asks the model for
pub const HEADER_MARKER: &str = "| Food Item";

const DELIMITER: char = '|';

/// Extract a nutrition table from a model reply, or return the reply as is.
pub fn extract(raw: &str) -> Extraction {
    match locate_table(raw) {
        Some(span) => {
            let table = parse_table(span);
            debug!(
                "Extracted table with {} columns and {} rows",
                table.headers.len(),
                table.rows.len()
            );
            Extraction::Table(table)
        }
        None => {
            debug!("No nutrition table found in reply, falling back to raw text");
            Extraction::Text(raw.to_string())
        }
    }
}

/// Same as [`extract`], for anything that carries reply text
pub fn extract_reply<T: TextBearing + ?Sized>(reply: &T) -> Extraction {
    extract(reply.text())
}

/// Slice of `raw` from the header marker through the last delimiter.
fn locate_table(raw: &str) -> Option<&str> {
    let start = header_offset(raw)?;
    let body_start = start + HEADER_MARKER.len();
    let end = body_start + raw[body_start..].rfind(DELIMITER)? + DELIMITER.len_utf8();
    Some(&raw[start..end])
}

/// Byte offset of the marker on the first line that opens with it.
fn header_offset(raw: &str) -> Option<usize> {
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if line[indent..].starts_with(HEADER_MARKER) {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

fn parse_table(span: &str) -> ParsedTable {
    let mut lines = span.split('\n');
    let headers = lines.next().map(split_cells).unwrap_or_default();

    // The line after the header is the markdown separator row.
    let rows = lines
        .skip(1)
        .map(|line| assemble_row(&headers, split_cells(line)))
        .collect();

    ParsedTable { headers, rows }
}

/// Split one table line into trimmed cells.
///
/// A single leading and a single trailing delimiter are dropped first.
fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix(DELIMITER).unwrap_or(line);
    let line = line.strip_suffix(DELIMITER).unwrap_or(line);

    line.split(DELIMITER)
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Pair cells with headers positionally, stopping at the shorter of the two.
/// Repeated header names keep the last cell.
fn assemble_row(headers: &[String], cells: Vec<String>) -> HashMap<String, String> {
    headers.iter().cloned().zip(cells).collect()
}
