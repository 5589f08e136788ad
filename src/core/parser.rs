use crate::core::error::{AnalysisError, Result};
use crate::core::io::LineSource;
use crate::core::model::{Cycle, RecalDatum, WILDCARD};
use std::path::Path;

/// Header every data row is parsed against. A table may restate it; the most
/// recent header line is the active one.
pub const CANONICAL_HEADER: [&str; 7] = ["rg", "dn", "Qrep", "pos", "NBases", "MMismatches", "Qemp"];

/// Lazy single-pass reader of recalibration covariate tables. Lines starting
/// with `#` and blank lines are skipped; a line whose first field is `rg`
/// replaces the active header and is validated against the canonical one.
pub struct RecordReader {
    lines: LineSource,
    line_no: usize,
    header_active: bool,
}

impl RecordReader {
    pub fn new(lines: LineSource) -> Self {
        Self {
            lines,
            line_no: 0,
            header_active: false,
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(LineSource::open(path)?))
    }

    pub fn next_record(&mut self) -> Result<Option<RecalDatum>> {
        loop {
            let line_no = self.line_no + 1;
            let raw = match self.lines.next_line()? {
                Some(raw) => raw,
                None => return Ok(None),
            };
            self.line_no = line_no;
            let line = std::str::from_utf8(raw)
                .map_err(|_| AnalysisError::InvalidUtf8 { line: line_no })?
                .trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields[0] == CANONICAL_HEADER[0] {
                validate_header(&fields, line_no)?;
                self.header_active = true;
                continue;
            }
            if !self.header_active {
                return Err(AnalysisError::MissingHeader { line: line_no });
            }
            return parse_row(&fields, line_no).map(Some);
        }
    }

    pub fn read_all(&mut self) -> Result<Vec<RecalDatum>> {
        let mut records = Vec::new();
        while let Some(datum) = self.next_record()? {
            records.push(datum);
        }
        Ok(records)
    }
}

fn validate_header(fields: &[&str], line: usize) -> Result<()> {
    if fields.len() != CANONICAL_HEADER.len() {
        return Err(AnalysisError::RowWidth {
            line,
            expected: CANONICAL_HEADER.len(),
            actual: fields.len(),
        });
    }
    for (column, expected) in CANONICAL_HEADER.iter().enumerate() {
        if fields[column] != *expected {
            return Err(AnalysisError::HeaderMismatch {
                line,
                column,
                found: fields[column].to_string(),
                expected: *expected,
            });
        }
    }
    Ok(())
}

fn parse_row(fields: &[&str], line: usize) -> Result<RecalDatum> {
    if fields.len() != CANONICAL_HEADER.len() {
        return Err(AnalysisError::RowWidth {
            line,
            expected: CANONICAL_HEADER.len(),
            actual: fields.len(),
        });
    }
    let q_reported = parse_int(fields[2], "Qrep", line)? as f64;
    let cycle = parse_cycle(fields[3], line)?;
    let n_bases = parse_count(fields[4], "NBases", line)?;
    let n_mismatches = parse_count(fields[5], "MMismatches", line)?;
    // type-checked only; the empirical quality is re-derived from the counts
    parse_int(fields[6], "Qemp", line)?;
    if n_mismatches > n_bases {
        return Err(AnalysisError::MismatchExceedsBases {
            line,
            n_mismatches,
            n_bases,
        });
    }
    Ok(RecalDatum::from_counts(
        fields[0].to_string(),
        fields[1].to_string(),
        q_reported,
        cycle,
        n_bases,
        n_mismatches,
    ))
}

fn parse_cycle(value: &str, line: usize) -> Result<Cycle> {
    if value == WILDCARD {
        Ok(Cycle::Any)
    } else {
        parse_int(value, "pos", line).map(Cycle::At)
    }
}

fn parse_int(value: &str, field: &'static str, line: usize) -> Result<i64> {
    value.parse::<i64>().map_err(|_| AnalysisError::ParseType {
        line,
        field,
        value: value.to_string(),
    })
}

fn parse_count(value: &str, field: &'static str, line: usize) -> Result<u64> {
    value.parse::<u64>().map_err(|_| AnalysisError::ParseType {
        line,
        field,
        value: value.to_string(),
    })
}
