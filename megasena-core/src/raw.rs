use std::collections::BTreeMap;

use chrono::NaiveDate;

pub const COL_DRAW_ID: &str = "Concurso";
pub const COL_DATE: &str = "Data do Sorteio";
pub const BALL_COLUMNS: [&str; 6] = ["Bola1", "Bola2", "Bola3", "Bola4", "Bola5", "Bola6"];

/// Every field a dataset must carry, in report order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_DRAW_ID,
    COL_DATE,
    BALL_COLUMNS[0],
    BALL_COLUMNS[1],
    BALL_COLUMNS[2],
    BALL_COLUMNS[3],
    BALL_COLUMNS[4],
    BALL_COLUMNS[5],
];

/// Cell value as decoded by the ingestion side, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Empty,
}

impl FieldValue {
    /// Integral value, accepting floats with no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// One source row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row in the standard layout: id, `DD/MM/AAAA` date and six balls.
    pub fn draw(draw_id: i64, date: &str, balls: [i64; 6]) -> Self {
        let mut record = RawRecord::new()
            .with(COL_DRAW_ID, draw_id)
            .with(COL_DATE, date);
        for (column, ball) in BALL_COLUMNS.iter().zip(balls) {
            record.insert(column, FieldValue::Int(ball));
        }
        record
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_integer() {
        assert_eq!(FieldValue::Int(7).as_integer(), Some(7));
        assert_eq!(FieldValue::Float(7.0).as_integer(), Some(7));
        assert_eq!(FieldValue::Float(7.5).as_integer(), None);
        assert_eq!(FieldValue::Float(f64::NAN).as_integer(), None);
        assert_eq!(FieldValue::Text("7".into()).as_integer(), None);
        assert_eq!(FieldValue::Empty.as_integer(), None);
    }

    #[test]
    fn test_draw_layout() {
        let record = RawRecord::draw(12, "01/02/2020", [1, 2, 3, 4, 5, 6]);
        for column in REQUIRED_COLUMNS {
            assert!(record.has_field(column), "missing {}", column);
        }
        assert_eq!(record.get("Bola6"), Some(&FieldValue::Int(6)));
        assert_eq!(record.get(COL_DATE), Some(&FieldValue::Text("01/02/2020".into())));
    }
}
