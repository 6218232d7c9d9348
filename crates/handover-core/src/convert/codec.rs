//! CSV encoding and decoding of flat rows.

use std::fmt;

use thiserror::Error;

use super::{FlatRow, CSV_HEADERS};

/// A CSV file that could not be read as a whole
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    /// 1-based line where the fault was detected, when known
    pub line: Option<u64>,
    pub message: String,
}

impl ParseError {
    fn new(line: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "CSV parse error at line {line}: {}", self.message),
            None => write!(f, "CSV parse error: {}", self.message),
        }
    }
}

impl From<csv::Error> for ParseError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(csv::Position::line);
        let message = match error.kind() {
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => format!("expected {expected_len} fields but found {len}"),
            csv::ErrorKind::Utf8 { .. } => "file is not valid UTF-8".to_string(),
            _ => error.to_string(),
        };
        Self::new(line, message)
    }
}

/// Render rows as CSV. The header row is always written, even for no rows.
pub fn render_csv(rows: &[FlatRow]) -> crate::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer.into_inner().map_err(|error| {
        crate::Error::Io(std::io::Error::new(
            error.error().kind(),
            error.error().to_string(),
        ))
    })?;
    String::from_utf8(bytes).map_err(|error| crate::Error::InvalidInput(error.to_string()))
}

/// Parse CSV text into rows.
///
/// The first line must be a header naming at least one known column.
/// Columns are matched by name; absent ones read as empty strings. Blank
/// lines are skipped. Any structural fault fails the whole parse.
pub fn parse_csv(input: &str) -> Result<Vec<FlatRow>, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    if let Some(line) = unterminated_quote_line(input) {
        return Err(ParseError::new(Some(line), "unterminated quoted field"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::Headers)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    if !headers
        .iter()
        .any(|header| CSV_HEADERS.contains(&header))
    {
        return Err(ParseError::new(
            Some(1),
            format!("missing header row (expected {})", CSV_HEADERS.join(",")),
        ));
    }

    let rows = reader
        .deserialize::<FlatRow>()
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(rows = rows.len(), "Parsed CSV rows");
    Ok(rows)
}

/// Find the line where a quoted field is opened but never closed.
///
/// A quote opens a field only as its first character. Inside a quoted field
/// `""` is a literal quote and a lone `"` closes it; anywhere else a quote is
/// ordinary text.
fn unterminated_quote_line(input: &str) -> Option<u64> {
    let mut chars = input.chars().peekable();
    let mut line = 1;
    let mut at_field_start = true;

    while let Some(ch) = chars.next() {
        match ch {
            '"' if at_field_start => {
                let opened_at = line;
                loop {
                    match chars.next() {
                        None => return Some(opened_at),
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                        }
                        Some('"') => break,
                        Some('\n') => line += 1,
                        Some(_) => {}
                    }
                }
                at_field_start = false;
            }
            ',' | '\r' => at_field_start = true,
            '\n' => {
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    None
}
