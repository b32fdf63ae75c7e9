//! Delimited-text export and the small CSV reader used for catalog import

use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

use crate::traits::ReportSink;
use crate::types::*;

/// Column headers of the delimited-text report
pub const REPORT_HEADERS: [&str; 4] = ["barcode", "required", "scanned", "status"];

/// Delimited-text sink producing RFC 4180 style CSV
#[derive(Debug, Clone)]
pub struct CsvSink {
    /// Emit the header line first
    pub include_headers: bool,
}

impl Default for CsvSink {
    fn default() -> Self {
        Self {
            include_headers: true,
        }
    }
}

impl ReportSink for CsvSink {
    type Output = String;

    fn render(&self, rows: &[VerifyRow]) -> VerifyResult<String> {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        if self.include_headers {
            lines.push(encode_record(REPORT_HEADERS));
        }
        for row in rows {
            let required = row.required.to_string();
            let scanned = row.scanned.to_string();
            lines.push(encode_record([
                row.barcode.as_str(),
                required.as_str(),
                scanned.as_str(),
                row.status.as_str(),
            ]));
        }
        Ok(lines.join("\n"))
    }
}

/// Quote a field when it contains a delimiter, quote or line break
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Encode one record as a CSV line (no terminator)
pub fn encode_record<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Drop a leading byte order mark
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Parse CSV text into raw records.
///
/// LF, CRLF and CR all end a record; inside quoted fields they are kept
/// verbatim.
pub fn parse_csv_raw(text: &str) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = strip_bom(text).chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    cur.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => cur.push(ch),
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => row.push(std::mem::take(&mut cur)),
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut cur));
                    out.push(std::mem::take(&mut row));
                }
                _ => cur.push(ch),
            }
        }
    }
    if !cur.is_empty() || !row.is_empty() {
        row.push(cur);
        out.push(row);
    }
    out
}

/// One CSV record as `(header, cell)` pairs in file column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRecord(Vec<(String, String)>);

impl CsvRecord {
    /// Cell under the first column named exactly `header`
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, value)| value.as_str())
    }

    /// `(header, cell)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

/// Header-keyed CSV records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRecords {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRecord>,
}

/// Parse CSV text using the first record as trimmed headers.
///
/// Records whose cells are all blank are skipped; cells are trimmed and
/// missing trailing cells read as empty strings.
pub fn parse_csv_records(text: &str) -> CsvRecords {
    let mut raw = parse_csv_raw(text).into_iter();
    let Some(header_row) = raw.next() else {
        return CsvRecords::default();
    };
    let headers: Vec<String> = header_row.iter().map(|h| h.trim().to_string()).collect();

    let rows = raw
        .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
        .map(|r| {
            CsvRecord(
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| {
                        let cell = r.get(i).map(|c| c.trim()).unwrap_or("");
                        (h.clone(), cell.to_string())
                    })
                    .collect(),
            )
        })
        .collect();

    CsvRecords { headers, rows }
}

/// Cell of the leftmost column whose header matches any of `keys`,
/// case-insensitively
pub fn pick<'a>(record: &'a CsvRecord, keys: &[&str]) -> Option<&'a str> {
    record
        .iter()
        .find(|(header, _)| keys.iter().any(|key| header.eq_ignore_ascii_case(key)))
        .map(|(_, value)| value)
}

/// Lenient number parse: keeps digits, `.` and `-`, and yields 0 when the
/// remainder does not parse.
pub fn to_number_safe(value: Option<&str>) -> BigDecimal {
    let Some(value) = value else {
        return BigDecimal::zero();
    };
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    BigDecimal::from_str(&cleaned).unwrap_or_else(|_| BigDecimal::zero())
}
