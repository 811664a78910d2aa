//! Label extraction: find `@field` placeholder cells in a template workbook

use crate::error::SheetResult;
use crate::excel::workbook::Workbook;
use crate::types::{CellValue, LabeledCell, LABEL_MARKER};

/// Parse an .xlsx buffer and collect every labeled cell.
///
/// Sheets are visited in workbook order and cells in reading order. An empty
/// result is not an error here; the caller decides what that means.
pub fn extract_labels(bytes: &[u8]) -> SheetResult<Vec<LabeledCell>> {
    let workbook = Workbook::from_bytes(bytes)?;
    Ok(labels_in(&workbook))
}

/// Labeled cells of an already loaded workbook.
pub fn labels_in(workbook: &Workbook) -> Vec<LabeledCell> {
    let mut result = Vec::new();

    for sheet in workbook.sheets() {
        for (addr, cell) in sheet.cells() {
            if let CellValue::String(text) = &cell.value {
                if text.starts_with(LABEL_MARKER) {
                    result.push(LabeledCell {
                        cell: addr,
                        value: text.clone(),
                        sheet_name: sheet.name().to_string(),
                    });
                }
            }
        }
    }

    result
}
