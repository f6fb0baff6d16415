//! @ai:module:intent Parse tab-separated submission files into ordered records
//! @ai:module:layer application
//! @ai:module:public_api parse_file, parse_records, Record
//! @ai:module:depends_on label, error
//! @ai:module:stateless true

use crate::error::{Error, FormatError, FormatErrorKind, Result};
use crate::label::Label;
use std::path::Path;

/// @ai:intent One `<identifier><TAB><label>` line of a submission or gold file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub label: Label,
    pub line: usize,
}

/// @ai:intent Read and parse a submission file
/// @ai:pre path exists and is readable
/// @ai:post records appear in file order, one per non-blank line
/// @ai:effects fs:read
/// @ai:edge_cases bytes that are not UTF-8 are a format error on the line holding them
pub fn parse_file(path: &Path) -> Result<Vec<Record>> {
    let bytes = std::fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let records = decode(&bytes)
        .and_then(parse_records)
        .map_err(|e| Error::Format {
            path: path.to_path_buf(),
            source: e,
        })?;

    tracing::debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

/// @ai:intent Decode file bytes as UTF-8, locating the first invalid byte by line
/// @ai:effects pure
fn decode(bytes: &[u8]) -> std::result::Result<&str, FormatError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        let start = valid
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let end = bytes[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |i| start + i);

        FormatError {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            content: String::from_utf8_lossy(&bytes[start..end])
                .trim_end_matches('\r')
                .to_string(),
            kind: FormatErrorKind::InvalidEncoding,
        }
    })
}

/// @ai:intent Parse file content, stopping at the first malformed line
/// @ai:effects pure
/// @ai:edge_cases blank lines are skipped, CRLF line endings and a leading BOM are accepted
pub fn parse_records(content: &str) -> std::result::Result<Vec<Record>, FormatError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = Vec::new();

    for (line_idx, raw) in content.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }

        records.push(parse_line(raw, line_idx + 1)?);
    }

    Ok(records)
}

/// @ai:intent Parse a single non-blank line
/// @ai:effects pure
fn parse_line(raw: &str, line: usize) -> std::result::Result<Record, FormatError> {
    let fail = |kind| FormatError {
        line,
        content: raw.trim_end_matches('\r').to_string(),
        kind,
    };

    let fields: Vec<&str> = raw.split('\t').map(str::trim).collect();

    let [id, label] = fields.as_slice() else {
        return Err(fail(FormatErrorKind::FieldCount(fields.len())));
    };

    if id.is_empty() {
        return Err(fail(FormatErrorKind::EmptyIdentifier));
    }

    let label = label
        .parse::<Label>()
        .map_err(|text| fail(FormatErrorKind::UnknownLabel(text)))?;

    Ok(Record {
        id: id.to_string(),
        label,
        line,
    })
}
