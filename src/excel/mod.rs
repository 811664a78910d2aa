//! Excel template processing
//!
//! - Labels: find `@field` placeholder cells in an uploaded workbook
//! - Filler: write one record per worksheet and mark matching survey answers
//! - Workbook: the in-memory value model both of them read
//! - Template: the uploaded file itself, where the fill's edits are written

pub mod filler;
pub mod format;
pub mod labels;
pub mod template;
pub mod workbook;

pub use filler::{
    fill_template, fill_with_records, fill_workbook, FillOutcome, FillSummary, TemplateLayout,
    MARKER_TOKEN,
};
pub use format::{format_value, normalize};
pub use labels::{extract_labels, labels_in};
pub use template::{CellEdit, TemplateFile};
pub use workbook::{Cell, Workbook, Worksheet};
