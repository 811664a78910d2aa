use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{SheetError, SheetResult};

/// Character that introduces a placeholder label in a template cell.
pub const LABEL_MARKER: char = '@';

//==============================================================================
// Cell Addressing
//==============================================================================

/// Zero-based cell position inside one worksheet.
///
/// Ordering is row-major (row first, then column), which is the reading order
/// used everywhere a sheet is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    pub row: u32,
    pub col: u16,
}

impl CellAddress {
    pub const MAX_ROW: u32 = 1_048_575;
    pub const MAX_COL: u16 = 16_383;

    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse an A1-style reference (`"B2"`, `"$AA$10"`).
    pub fn parse(a1: &str) -> SheetResult<Self> {
        let text = a1.trim().replace('$', "");
        let split = text
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| SheetError::InvalidAddress(a1.to_string()))?;
        let (letters, digits) = text.split_at(split);

        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SheetError::InvalidAddress(a1.to_string()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > Self::MAX_COL as u32 + 1 {
                return Err(SheetError::InvalidAddress(a1.to_string()));
            }
        }

        let row: u32 = digits
            .parse()
            .map_err(|_| SheetError::InvalidAddress(a1.to_string()))?;
        if row == 0 || row > Self::MAX_ROW + 1 {
            return Err(SheetError::InvalidAddress(a1.to_string()));
        }

        Ok(Self {
            row: row - 1,
            col: (col - 1) as u16,
        })
    }

    /// Column letters for a zero-based index (0 → A, 25 → Z, 26 → AA).
    pub fn column_letters(col: u16) -> String {
        let mut result = String::new();
        let mut num = col as u32;

        loop {
            let remainder = num % 26;
            result.insert(0, (b'A' + remainder as u8) as char);
            if num < 26 {
                break;
            }
            num = num / 26 - 1;
        }

        result
    }

    /// The neighbouring cell in the previous column, if there is one.
    pub fn left(&self) -> Option<Self> {
        self.col.checked_sub(1).map(|col| Self { row: self.row, col })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CellAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        CellAddress::parse(&text).map_err(de::Error::custom)
    }
}

//==============================================================================
// Cell and Field Values
//==============================================================================

/// A value as stored in a workbook cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    String(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date (days since 1899-12-30, fraction = time of day)
    DateTime(f64),
    /// Error literal such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::DateTime(serial) => f.write_str(&format_number(*serial)),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

/// Scalar value of one record field.
///
/// Deserializes from plain JSON/YAML scalars; `null` becomes `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(f64),
    Date(NaiveDateTime),
    String(String),
    Empty,
}

impl FieldValue {
    /// `Empty` and the empty string carry nothing worth writing.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Textual form used when searching worksheet text for this value.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::Empty => None,
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(format_number(*n)),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Date(dt) => Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        FieldValue::Date(dt)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Empty)
    }
}

/// Integers print without a fractional part, everything else as-is.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

//==============================================================================
// Records
//==============================================================================

/// One flat survey record: field name → scalar value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(n, v)| (n, v)))
    }
}

/// Field values that are not scalars (arrays, nested objects) are dropped.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Scalar(FieldValue),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((name, raw)) = map.next_entry::<String, RawField>()? {
                    if let RawField::Scalar(value) = raw {
                        record.insert(name, value);
                    }
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

//==============================================================================
// Labels
//==============================================================================

/// A template cell whose text starts with [`LABEL_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledCell {
    pub cell: CellAddress,
    pub value: String,
    pub sheet_name: String,
}

impl LabeledCell {
    /// Label text without the leading marker (`"@phone"` → `"phone"`).
    pub fn field_name(&self) -> &str {
        self.value
            .strip_prefix(LABEL_MARKER)
            .unwrap_or(&self.value)
    }
}
