//! Uploaded template as a styled document: edits go into the original file
//! so fonts, borders, fills, column widths and untouched sheets survive.

use std::io::Cursor;

use umya_spreadsheet::{reader, writer, Spreadsheet};

use crate::error::{SheetError, SheetResult};
use crate::types::{CellAddress, CellValue};

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// A single cell change on the named worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    pub sheet: String,
    pub addr: CellAddress,
    pub value: CellValue,
}

pub struct TemplateFile {
    book: Spreadsheet,
}

impl TemplateFile {
    pub fn from_bytes(bytes: &[u8]) -> SheetResult<Self> {
        let book = reader::xlsx::read_reader(Cursor::new(bytes), true)
            .map_err(|e| SheetError::Format(format!("Failed to read workbook: {}", e)))?;
        Ok(Self { book })
    }

    /// Write one value. The cell keeps its style; dates also get a date format.
    pub fn apply(&mut self, edit: &CellEdit) -> SheetResult<()> {
        let sheet = self
            .book
            .get_sheet_by_name_mut(&edit.sheet)
            .ok_or_else(|| SheetError::Format(format!("Workbook has no sheet '{}'", edit.sheet)))?;
        // umya coordinates are 1-based (column, row)
        let cell = sheet.get_cell_mut((edit.addr.col as u32 + 1, edit.addr.row + 1));

        match &edit.value {
            CellValue::Empty => {
                cell.set_value_string("");
            }
            CellValue::String(s) => {
                cell.set_value_string(s.clone());
            }
            CellValue::Number(n) => {
                cell.set_value_number(*n);
            }
            CellValue::Bool(b) => {
                cell.set_value_bool(*b);
            }
            CellValue::DateTime(serial) => {
                cell.set_value_number(*serial);
                cell.get_style_mut()
                    .get_number_format_mut()
                    .set_format_code(DATE_NUM_FORMAT);
            }
            CellValue::Error(e) => {
                cell.set_value_string(e.clone());
            }
        }
        Ok(())
    }

    pub fn apply_all(&mut self, edits: &[CellEdit]) -> SheetResult<()> {
        edits.iter().try_for_each(|edit| self.apply(edit))
    }

    pub fn to_bytes(&self) -> SheetResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        writer::xlsx::write_writer(&self.book, &mut buffer)
            .map_err(|e| SheetError::Format(format!("Failed to write workbook: {}", e)))?;
        Ok(buffer.into_inner())
    }
}
