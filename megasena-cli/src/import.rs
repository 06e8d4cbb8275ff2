use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use megasena_core::raw::{FieldValue, RawRecord};

/// Decimal with Brazilian separators: `.` groups thousands, `,` is the
/// decimal mark. A `.` outside well-formed groups of three is an error.
pub fn parse_brazilian_decimal(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    if !is_brazilian_decimal(s) {
        bail!("Não foi possível interpretar o número: '{}'", s);
    }
    let normalized = s.replace('.', "").replace(',', ".");
    normalized
        .parse::<f64>()
        .with_context(|| format!("Não foi possível interpretar o número: '{}'", s))
}

/// `-?\d+` or `-?\d{1,3}(\.\d{3})+`, optionally followed by `,\d+`.
fn is_brazilian_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (integer, fraction) = match unsigned.split_once(',') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    if let Some(fraction) = fraction {
        if !all_digits(fraction) {
            return false;
        }
    }

    let mut groups = integer.split('.');
    let head = groups.next().unwrap_or_default();
    if !all_digits(head) {
        return false;
    }
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return false;
        }
        grouped = true;
    }
    !grouped || head.len() <= 3
}

/// Decodes one cell into the most specific value it represents.
pub fn parse_cell(raw: &str) -> FieldValue {
    let s = raw.trim();
    if s.is_empty() {
        return FieldValue::Empty;
    }
    if let Ok(i) = s.parse::<i64>() {
        return FieldValue::Int(i);
    }
    if s.contains(&[',', '.'][..]) {
        if let Ok(f) = parse_brazilian_decimal(s) {
            return FieldValue::Float(f);
        }
    }
    FieldValue::Text(s.to_string())
}

pub struct ImportResult {
    /// One record per data row; an unreadable row is kept as an empty record
    /// so row numbers stay aligned with the file.
    pub records: Vec<RawRecord>,
    pub total_rows: u32,
    /// File lines (1-based, header included) the csv reader could not decode.
    pub unreadable_lines: Vec<u64>,
}

impl ImportResult {
    pub fn is_complete(&self) -> bool {
        self.unreadable_lines.is_empty()
    }
}

pub fn import_csv(path: &Path, delimiter: u8) -> Result<ImportResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Não foi possível abrir {:?}", path))?;
    read_csv(file, delimiter).with_context(|| format!("Falha ao ler {:?}", path))
}

pub fn read_csv<R: Read>(source: R, delimiter: u8) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .context("Cabeçalho ausente ou ilegível")?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut result = ImportResult {
        records: Vec::new(),
        total_rows: 0,
        unreadable_lines: Vec::new(),
    };

    for record_result in reader.records() {
        result.total_rows += 1;
        match record_result {
            Ok(row) => {
                let mut record = RawRecord::new();
                for (name, cell) in headers.iter().zip(row.iter()) {
                    record.insert(name, parse_cell(cell));
                }
                result.records.push(record);
            }
            Err(e) => {
                let line = e
                    .position()
                    .map(|pos| pos.line())
                    .unwrap_or(u64::from(result.total_rows) + 1);
                warn!(line, error = %e, "linha ilegível");
                result.unreadable_lines.push(line);
                result.records.push(RawRecord::new());
            }
        }
    }

    Ok(result)
}
