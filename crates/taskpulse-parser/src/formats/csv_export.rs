use std::sync::Arc;

use csv::{Position, ReaderBuilder, StringRecord};
use tracing::debug;

use crate::errors::ParserError;
use crate::model::{RawRecord, TabularData};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses a spreadsheet CSV export whose first non-blank row is the header row.
///
/// Rows are allowed to be ragged. Lines whose cells are all blank are skipped, and a
/// file without data rows (or without any rows at all) is a valid, empty table.
///
/// A quoted field left open at end of input is rejected. The reader would otherwise
/// fold every following line into that one cell.
pub fn parse_tabular(content: &[u8]) -> Result<TabularData, ParserError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut rows = reader.records();
    let mut last_start: Option<Position> = None;

    let headers: Arc<[String]> = loop {
        match rows.next() {
            None => {
                check_closed_quotes(content, last_start.as_ref())?;
                return Ok(TabularData::empty());
            }
            Some(record) => {
                let record = record?;
                last_start = record.position().cloned();
                if is_blank(&record) {
                    continue;
                }
                break record.iter().map(|h| h.trim().to_string()).collect();
            }
        }
    };

    let mut records = Vec::new();
    for record in rows {
        let record = record?;
        last_start = record.position().cloned();
        if is_blank(&record) {
            continue;
        }
        let values = record.iter().map(str::to_string).collect();
        records.push(RawRecord::new(Arc::clone(&headers), values));
    }

    check_closed_quotes(content, last_start.as_ref())?;

    debug!(
        columns = headers.len(),
        rows = records.len(),
        "parsed tabular export"
    );

    Ok(TabularData { headers, records })
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Only the last record can swallow an unclosed quote, so only its bytes are rescanned.
fn check_closed_quotes(content: &[u8], last_start: Option<&Position>) -> Result<(), ParserError> {
    let Some(start) = last_start else {
        return Ok(());
    };
    let tail = usize::try_from(start.byte())
        .ok()
        .and_then(|offset| content.get(offset..))
        .unwrap_or_default();
    if ends_inside_quotes(tail) {
        return Err(ParserError::Malformed { line: start.line() });
    }
    Ok(())
}

/// Quote tracking as the reader does it: a quote opens a field only at the field's
/// start, and `""` inside a quoted field is an escaped quote.
fn ends_inside_quotes(bytes: &[u8]) -> bool {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut iter = bytes.iter().peekable();

    while let Some(&byte) = iter.next() {
        if in_quotes {
            if byte == b'"' {
                if iter.peek() == Some(&&b'"') {
                    iter.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match byte {
            b'"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            b',' | b'\n' | b'\r' => at_field_start = true,
            _ => at_field_start = false,
        }
    }

    in_quotes
}
