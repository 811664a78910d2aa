//! Pharmacy Sheets - survey records service and Excel template filler
//!
//! Stores pharmacy survey responses and fills spreadsheet templates with them.
//!
//! # Features
//!
//! - `@field` labels in a template workbook mark where record values go
//! - Worksheet `i` is filled from record `i`, using the first worksheet's layout
//! - Marker fields: cells whose text matches a record answer get a `"1"` to their left
//! - HTTP API with pharmacy CRUD and template upload
//!
//! # Example
//!
//! ```no_run
//! use pharmacy_sheets::excel::{extract_labels, fill_with_records};
//! use pharmacy_sheets::types::Record;
//!
//! let template = std::fs::read("survey.xlsx")?;
//! let labels = extract_labels(&template)?;
//!
//! let records = vec![Record::new().with("phone", "063-030-1943").with("experience", "10+")];
//! let (filled, summary) = fill_with_records(&template, &labels, &records, &["experience".to_string()])?;
//!
//! println!("Filled {} sheets", summary.sheets_filled);
//! std::fs::write("filled.xlsx", filled)?;
//! # Ok::<(), pharmacy_sheets::error::SheetError>(())
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{SheetError, SheetResult};
pub use types::{CellAddress, CellValue, FieldValue, LabeledCell, Record};
