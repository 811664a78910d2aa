//! In-memory value model of a workbook, read with calamine

use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::error::{SheetError, SheetResult};
use crate::types::{CellAddress, CellValue};

/// A populated cell: its value plus the formula that produced it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub formula: Option<String>,
}

impl Cell {
    pub fn value(value: CellValue) -> Self {
        Self {
            value,
            formula: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<CellAddress, Cell>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, addr: CellAddress) -> Option<&CellValue> {
        self.cells.get(&addr).map(|c| &c.value)
    }

    pub fn cell(&self, addr: CellAddress) -> Option<&Cell> {
        self.cells.get(&addr)
    }

    /// Overwrite a cell with a literal value. Any formula there is dropped.
    pub fn set_value(&mut self, addr: CellAddress, value: CellValue) {
        self.cells.insert(addr, Cell::value(value));
    }

    pub fn set_formula(&mut self, addr: CellAddress, formula: impl Into<String>, cached: CellValue) {
        self.cells.insert(
            addr,
            Cell {
                value: cached,
                formula: Some(formula.into()),
            },
        );
    }

    /// Populated cells in reading order (top-to-bottom, left-to-right).
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &Cell)> {
        self.cells.iter().map(|(addr, cell)| (*addr, cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Ordered collection of worksheets.
///
/// The first worksheet is the template worksheet: its label layout drives
/// the filling of every sheet in the book.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Worksheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheets_mut(&mut self) -> &mut [Worksheet] {
        &mut self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn template_sheet(&self) -> Option<&Worksheet> {
        self.sheets.first()
    }

    /// Parse an .xlsx buffer.
    pub fn from_bytes(bytes: &[u8]) -> SheetResult<Self> {
        let mut xlsx: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        let mut workbook = Workbook::new();
        let sheet_names = xlsx.sheet_names().to_vec();

        for sheet_name in sheet_names {
            let mut sheet = Worksheet::new(sheet_name.clone());

            let range = xlsx.worksheet_range(&sheet_name)?;
            if let Some((row0, col0)) = range.start() {
                for (row, col, data) in range.used_cells() {
                    let addr = absolute(row0, col0, row, col)?;
                    let value = convert_data(data);
                    if !value.is_empty() {
                        sheet.set_value(addr, value);
                    }
                }
            }

            // Formula text lives in a separate range; calamine drops the leading '='
            if let Ok(formulas) = xlsx.worksheet_formula(&sheet_name) {
                if let Some((row0, col0)) = formulas.start() {
                    for (row, col, formula) in formulas.used_cells() {
                        let addr = absolute(row0, col0, row, col)?;
                        let cached = sheet.get(addr).cloned().unwrap_or(CellValue::Empty);
                        sheet.set_formula(addr, formula.clone(), cached);
                    }
                }
            }

            workbook.add_sheet(sheet);
        }

        Ok(workbook)
    }
}

fn absolute(row0: u32, col0: u32, row: usize, col: usize) -> SheetResult<CellAddress> {
    let row = row0 as usize + row;
    let col = col0 as usize + col;
    if row > CellAddress::MAX_ROW as usize || col > CellAddress::MAX_COL as usize {
        return Err(SheetError::Format(format!(
            "cell ({}, {}) is outside the worksheet grid",
            row, col
        )));
    }
    Ok(CellAddress::new(row as u32, col as u16))
}

fn convert_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}
