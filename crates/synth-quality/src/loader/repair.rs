//! Text-level helpers used by the later loading strategies.
//!
//! Both functions work on raw text so they can run when the CSV parser has
//! already given up on the input.

use crate::error::{QualityError, Result};

/// Number of mismatched lines described individually in the diagnostics.
const REPORTED_LINES: usize = 5;

/// Lines of input inspected when sniffing a delimiter.
const SNIFF_SAMPLE_LINES: usize = 20;

/// Repaired text plus the diagnostics describing what was changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub text: String,
    pub repaired_lines: usize,
    pub diagnostics: Vec<String>,
}

/// Force every data line to the field count of the header.
///
/// Fields are split on plain commas. Lines with too many fields are truncated,
/// lines with too few are padded with empty fields. Blank lines are dropped.
///
/// Fails with [`QualityError::InsufficientData`] when fewer than two non-blank
/// lines exist, and with a load error when no line needs repair (the input is
/// broken in a way this strategy cannot fix).
pub fn repair_ragged_lines(text: &str) -> Result<RepairOutcome> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(QualityError::InsufficientData);
    }

    let header = lines[0];
    let expected = header.split(',').count();
    let mut diagnostics = vec![format!("Expected {} columns from header", expected)];

    let mut problem_lines = 0usize;
    let mut repaired = Vec::with_capacity(lines.len());
    repaired.push(header.to_string());

    for (idx, line) in lines.iter().enumerate().skip(1) {
        let mut fields: Vec<&str> = line.split(',').collect();
        if fields.len() != expected {
            problem_lines += 1;
            if problem_lines <= REPORTED_LINES {
                diagnostics.push(format!(
                    "Line {}: has {} fields (expected {})",
                    idx + 1,
                    fields.len(),
                    expected
                ));
            }
            fields.resize(expected, "");
        }
        repaired.push(fields.join(","));
    }

    if problem_lines == 0 {
        return Err(QualityError::Load {
            strategy: "manual repair".to_string(),
            reason: "Could not identify CSV structure issues".to_string(),
        });
    }

    diagnostics.push(format!("Found {} problematic lines", problem_lines));

    Ok(RepairOutcome {
        text: repaired.join("\n"),
        repaired_lines: problem_lines,
        diagnostics,
    })
}

/// One physical record of delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Record text without its line ending.
    pub text: &'a str,
    /// Field count, delimiters inside quoted fields excluded.
    pub fields: usize,
}

/// A quoted field that is still open at the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnterminatedQuote {
    /// 1-based line on which the field was opened.
    pub line: usize,
}

/// Split `text` into records.
///
/// A quote only opens a field when it is the field's first character, and
/// `""` inside a quoted field is an escaped quote. Delimiters and newlines
/// inside quoted fields stay in their field. Blank records are dropped.
/// With `quote` set to `None` every byte is literal.
pub fn split_records(
    text: &str,
    delimiter: u8,
    quote: Option<u8>,
) -> std::result::Result<Vec<Record<'_>>, UnterminatedQuote> {
    let bytes = text.as_bytes();
    let mut records = Vec::new();
    let mut push = |start: usize, end: usize, fields: usize| {
        let line = &text[start..end];
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.trim().is_empty() {
            records.push(Record { text: line, fields });
        }
    };

    let mut start = 0;
    let mut fields = 1;
    let mut line = 1;
    let mut quote_line = 0;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if in_quotes {
            if Some(byte) == quote {
                if bytes.get(i + 1) == Some(&byte) {
                    i += 2;
                    continue;
                }
                in_quotes = false;
            } else if byte == b'\n' {
                line += 1;
            }
            i += 1;
            continue;
        }

        match byte {
            _ if at_field_start && Some(byte) == quote => {
                in_quotes = true;
                quote_line = line;
                at_field_start = false;
            }
            _ if byte == delimiter => {
                fields += 1;
                at_field_start = true;
            }
            b'\n' => {
                push(start, i, fields);
                start = i + 1;
                fields = 1;
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
        i += 1;
    }

    if in_quotes {
        return Err(UnterminatedQuote { line: quote_line });
    }
    if start < bytes.len() {
        push(start, bytes.len(), fields);
    }
    Ok(records)
}

/// Drop data records that have more fields than the header.
///
/// Returns the rebuilt text and the number of records dropped. Short records
/// are kept; the parser fills their missing fields.
pub fn drop_overlong_records(records: &[Record<'_>]) -> (String, usize) {
    let Some((header, rows)) = records.split_first() else {
        return (String::new(), 0);
    };

    let mut kept = vec![header.text];
    let mut dropped = 0;
    for record in rows {
        if record.fields > header.fields {
            dropped += 1;
        } else {
            kept.push(record.text);
        }
    }
    (kept.join("\n"), dropped)
}

/// Pick the delimiter that best explains the first lines of `text`.
///
/// A candidate must occur in the header. Candidates whose count is identical
/// on every sampled line win over inconsistent ones; ties go to the higher
/// header count, then to candidate order.
pub fn sniff_delimiter(text: &str, candidates: &[u8]) -> Option<u8> {
    let sample: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_SAMPLE_LINES)
        .collect();
    let header = sample.first()?;

    let mut best: Option<(bool, usize, u8)> = None;
    for &candidate in candidates {
        let header_count = count_unquoted(header, candidate);
        if header_count == 0 {
            continue;
        }
        let consistent = sample[1..]
            .iter()
            .all(|line| count_unquoted(line, candidate) == header_count);

        let better = match best {
            None => true,
            Some((best_consistent, best_count, _)) => {
                (consistent, header_count) > (best_consistent, best_count)
            }
        };
        if better {
            best = Some((consistent, header_count, candidate));
        }
    }

    best.map(|(_, _, delimiter)| delimiter)
}

/// Count occurrences of `delimiter` outside double-quoted sections.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
