use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use crate::models::{in_range, DrawHistory, DrawRecord, PICK_COUNT};
use crate::raw::{FieldValue, RawRecord, BALL_COLUMNS, COL_DATE, COL_DRAW_ID, REQUIRED_COLUMNS};

/// A problem found in a dataset. `row` is 1-based, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyDataset,
    MissingFields(Vec<String>),
    InvalidDrawId { row: usize },
    DuplicateDrawId { row: usize, draw_id: i64 },
    InvalidDate { row: usize },
    FutureDate { row: usize },
    InvalidNumbers { row: usize },
    DuplicateNumbers { row: usize },
}

impl ValidationError {
    pub fn row(&self) -> Option<usize> {
        match self {
            ValidationError::EmptyDataset | ValidationError::MissingFields(_) => None,
            ValidationError::InvalidDrawId { row }
            | ValidationError::DuplicateDrawId { row, .. }
            | ValidationError::InvalidDate { row }
            | ValidationError::FutureDate { row }
            | ValidationError::InvalidNumbers { row }
            | ValidationError::DuplicateNumbers { row } => Some(*row),
        }
    }

    /// Dataset-level errors rather than row errors.
    pub fn is_structural(&self) -> bool {
        self.row().is_none()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyDataset => write!(f, "Conjunto de dados vazio"),
            ValidationError::MissingFields(names) => {
                write!(f, "Colunas ausentes: {}", names.join(", "))
            }
            ValidationError::InvalidDrawId { row } => {
                write!(f, "Linha {}: Concurso deve ser um número inteiro positivo", row)
            }
            ValidationError::DuplicateDrawId { row, draw_id } => {
                write!(f, "Linha {}: Concurso {} repetido", row, draw_id)
            }
            ValidationError::InvalidDate { row } => {
                write!(f, "Linha {}: Data inválida - deve estar no formato DD/MM/AAAA", row)
            }
            ValidationError::FutureDate { row } => {
                write!(f, "Linha {}: Data não pode ser futura", row)
            }
            ValidationError::InvalidNumbers { row } => {
                write!(f, "Linha {}: Todos os números devem ser inteiros entre 1 e 60", row)
            }
            ValidationError::DuplicateNumbers { row } => {
                write!(f, "Linha {}: Números duplicados encontrados", row)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks every record against today's local date.
pub fn validate(records: &[RawRecord]) -> Vec<ValidationError> {
    validate_at(records, chrono::Local::now().date_naive())
}

/// Collects every violation; an empty result means the dataset is usable.
pub fn validate_at(records: &[RawRecord], today: NaiveDate) -> Vec<ValidationError> {
    let Some(first) = records.first() else {
        return vec![ValidationError::EmptyDataset];
    };

    let mut errors = Vec::new();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !first.has_field(column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        errors.push(ValidationError::MissingFields(missing));
    }

    let mut seen_ids = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let row = index + 1;

        match draw_id_of(record) {
            Some(id) => {
                if !seen_ids.insert(id) {
                    errors.push(ValidationError::DuplicateDrawId { row, draw_id: id as i64 });
                }
            }
            None => errors.push(ValidationError::InvalidDrawId { row }),
        }

        match date_of(record) {
            Some(date) if date > today => errors.push(ValidationError::FutureDate { row }),
            Some(_) => {}
            None => errors.push(ValidationError::InvalidDate { row }),
        }

        let balls: Vec<Option<i64>> = BALL_COLUMNS
            .iter()
            .map(|column| record.get(column).and_then(FieldValue::as_integer))
            .collect();

        let valid = balls.iter().flatten().filter(|&&b| in_range(b)).count();
        if valid != PICK_COUNT {
            errors.push(ValidationError::InvalidNumbers { row });
        }

        let integers: Vec<i64> = balls.iter().flatten().copied().collect();
        let distinct: HashSet<i64> = integers.iter().copied().collect();
        if distinct.len() != integers.len() {
            errors.push(ValidationError::DuplicateNumbers { row });
        }
    }

    errors
}

/// Validates then normalizes into a `DrawHistory`, or returns every error.
pub fn into_history(records: &[RawRecord]) -> Result<DrawHistory, Vec<ValidationError>> {
    into_history_at(records, chrono::Local::now().date_naive())
}

pub fn into_history_at(
    records: &[RawRecord],
    today: NaiveDate,
) -> Result<DrawHistory, Vec<ValidationError>> {
    let errors = validate_at(records, today);
    if !errors.is_empty() {
        return Err(errors);
    }

    let draws = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            normalize(record).ok_or(ValidationError::InvalidNumbers { row: index + 1 })
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| vec![e])?;

    Ok(DrawHistory::new(draws))
}

fn normalize(record: &RawRecord) -> Option<DrawRecord> {
    let draw_id = draw_id_of(record)?;
    let date = date_of(record)?;
    let mut numbers = [0u8; PICK_COUNT];
    for (slot, column) in numbers.iter_mut().zip(BALL_COLUMNS) {
        let value = record.get(column)?.as_integer()?;
        *slot = u8::try_from(value).ok()?;
    }
    DrawRecord::new(draw_id, date, numbers).ok()
}

fn draw_id_of(record: &RawRecord) -> Option<u32> {
    let id = record.get(COL_DRAW_ID)?.as_integer()?;
    u32::try_from(id).ok().filter(|&id| id > 0)
}

fn date_of(record: &RawRecord) -> Option<NaiveDate> {
    match record.get(COL_DATE)? {
        FieldValue::Date(date) => Some(*date),
        FieldValue::Text(text) => parse_draw_date(text),
        _ => None,
    }
}

/// Strict `DD/MM/AAAA`, rejecting impossible calendar days.
pub fn parse_draw_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}
