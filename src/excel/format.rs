//! Value formatting and text normalization shared by the template filler

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{CellValue, FieldValue};

/// Turn a record field into the value written to a cell.
pub fn format_value(value: &FieldValue) -> CellValue {
    match value {
        FieldValue::String(s) => CellValue::String(s.clone()),
        FieldValue::Number(n) => CellValue::Number(*n),
        FieldValue::Boolean(b) => CellValue::Bool(*b),
        FieldValue::Date(dt) => CellValue::DateTime(excel_serial(dt)),
        FieldValue::Empty => CellValue::String(String::new()),
    }
}

/// Canonical form for marker matching: en/em dashes become `-`, whitespace
/// runs collapse to one space, the ends are trimmed and the text lowercased.
pub fn normalize(text: &str) -> String {
    text.replace(['\u{2013}', '\u{2014}'], "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Excel serial number for a timestamp (1900 date system).
pub fn excel_serial(dt: &NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    (*dt - epoch).num_milliseconds() as f64 / 86_400_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_format_value_passes_scalars_through() {
        assert_eq!(
            format_value(&FieldValue::from("063-030-1943")),
            CellValue::String("063-030-1943".to_string())
        );
        assert_eq!(format_value(&FieldValue::Number(42.5)), CellValue::Number(42.5));
        assert_eq!(format_value(&FieldValue::Boolean(false)), CellValue::Bool(false));
    }

    #[test]
    fn test_format_value_empty_is_empty_string() {
        assert_eq!(
            format_value(&FieldValue::Empty),
            CellValue::String(String::new())
        );
    }

    #[test]
    fn test_format_value_date_becomes_serial() {
        assert_eq!(
            format_value(&FieldValue::Date(date(2024, 1, 1))),
            CellValue::DateTime(45292.0)
        );
    }

    #[test]
    fn test_excel_serial_with_time() {
        let noon = NaiveDate::from_ymd_opt(1900, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(excel_serial(&noon), 61.5);
    }

    #[test]
    fn test_normalize_dashes_and_spacing() {
        assert_eq!(normalize("A  B\u{2013}C"), "a b-c");
        assert_eq!(normalize("a b-c"), "a b-c");
        assert_eq!(normalize("10\u{2014}20"), "10-20");
    }

    #[test]
    fn test_normalize_trims_and_collapses_tabs_newlines() {
        assert_eq!(normalize("  Завідуюча\t\n аптеки  "), "завідуюча аптеки");
        assert_eq!(normalize("\u{00A0}31-45\u{00A0}"), "31-45");
    }

    #[test]
    fn test_normalize_does_not_remove_inner_spaces() {
        assert_ne!(normalize("10 +"), normalize("10+"));
        assert_eq!(normalize("10\u{2013}"), normalize("10-"));
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
