//! Template filler: write records into labeled cells and mark matching answers

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{SheetError, SheetResult};
use crate::excel::format::{format_value, normalize};
use crate::excel::template::{CellEdit, TemplateFile};
use crate::excel::workbook::{Workbook, Worksheet};
use crate::store::RecordSource;
use crate::types::{CellAddress, CellValue, LabeledCell, Record};

/// Value written to the left of a cell whose text matches a marker field.
pub const MARKER_TOKEN: &str = "1";

/// Field name → cell address, taken from the template worksheet only.
///
/// Every worksheet is assumed to share the template worksheet's geometry, so
/// the same addresses are used on all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateLayout {
    fields: HashMap<String, CellAddress>,
}

impl TemplateLayout {
    /// Build the layout from labels of `template_sheet`. Labels on other
    /// sheets are ignored; a repeated field keeps its last address.
    pub fn from_labels(template_sheet: &str, labels: &[LabeledCell]) -> Self {
        let fields = labels
            .iter()
            .filter(|label| label.sheet_name == template_sheet)
            .map(|label| (label.field_name().to_string(), label.cell))
            .collect();
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<CellAddress> {
        self.fields.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// What a fill pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillSummary {
    pub sheets_filled: usize,
    pub cells_written: usize,
    pub cells_marked: usize,
}

/// Counters plus every cell write, in the order they were made.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillOutcome {
    pub summary: FillSummary,
    pub edits: Vec<CellEdit>,
}

/// Fetch records from `source`, then fill the workbook in `bytes`.
///
/// `labels` must come from a workbook with the same sheets and geometry as
/// `bytes`. Nothing is returned unless the whole workbook was filled.
pub async fn fill_template(
    source: &dyn RecordSource,
    bytes: &[u8],
    labels: &[LabeledCell],
    marker_fields: &[String],
) -> SheetResult<Vec<u8>> {
    let records = source.fetch_all().await?;
    let (output, _) = fill_with_records(bytes, labels, &records, marker_fields)?;
    Ok(output)
}

/// Synchronous core of [`fill_template`] for callers that already hold the records.
pub fn fill_with_records(
    bytes: &[u8],
    labels: &[LabeledCell],
    records: &[Record],
    marker_fields: &[String],
) -> SheetResult<(Vec<u8>, FillSummary)> {
    if records.is_empty() {
        return Err(SheetError::NoData);
    }

    let mut workbook = Workbook::from_bytes(bytes)?;
    let FillOutcome { summary, edits } =
        fill_workbook(&mut workbook, labels, records, marker_fields)?;

    // Values are decided on the value model; the edits land in the original
    // file so its styling comes through unchanged
    let mut template = TemplateFile::from_bytes(bytes)?;
    template.apply_all(&edits)?;
    let output = template.to_bytes()?;

    info!(
        "Filled {} sheet(s): {} cell(s) written, {} cell(s) marked",
        summary.sheets_filled, summary.cells_written, summary.cells_marked
    );

    Ok((output, summary))
}

/// Fill a loaded workbook in place and report each write.
///
/// Worksheet `i` receives record `i`; sheets past the end of `records` are
/// left untouched and surplus records are ignored.
pub fn fill_workbook(
    workbook: &mut Workbook,
    labels: &[LabeledCell],
    records: &[Record],
    marker_fields: &[String],
) -> SheetResult<FillOutcome> {
    let template = workbook
        .template_sheet()
        .ok_or_else(|| SheetError::Format("Workbook has no worksheets".to_string()))?;
    let layout = TemplateLayout::from_labels(template.name(), labels);
    debug!(
        "Template sheet '{}' maps {} field(s)",
        template.name(),
        layout.len()
    );

    let mut outcome = FillOutcome::default();

    for (sheet, record) in workbook.sheets_mut().iter_mut().zip(records) {
        let mut edits = Vec::new();
        outcome.summary.cells_written += write_record(sheet, &layout, record, &mut edits);
        for field in marker_fields {
            outcome.summary.cells_marked += mark_matches(sheet, record, field, &mut edits);
        }
        outcome.summary.sheets_filled += 1;

        outcome
            .edits
            .extend(edits.into_iter().map(|(addr, value)| CellEdit {
                sheet: sheet.name().to_string(),
                addr,
                value,
            }));
    }

    Ok(outcome)
}

fn write_record(
    sheet: &mut Worksheet,
    layout: &TemplateLayout,
    record: &Record,
    edits: &mut Vec<(CellAddress, CellValue)>,
) -> usize {
    let mut written = 0;
    for (field, value) in record.iter() {
        if value.is_blank() {
            continue;
        }
        if let Some(addr) = layout.get(field) {
            let value = format_value(value);
            sheet.set_value(addr, value.clone());
            edits.push((addr, value));
            written += 1;
        }
    }
    written
}

/// Put [`MARKER_TOKEN`] left of every cell whose normalized text equals the
/// normalized value of `field` on `record`. Formula cells and first-column
/// matches are skipped.
fn mark_matches(
    sheet: &mut Worksheet,
    record: &Record,
    field: &str,
    edits: &mut Vec<(CellAddress, CellValue)>,
) -> usize {
    let Some(target) = record
        .get(field)
        .filter(|value| !value.is_blank())
        .and_then(|value| value.to_text())
    else {
        return 0;
    };
    let target = normalize(&target);

    let hits: Vec<CellAddress> = sheet
        .cells()
        .filter(|(_, cell)| cell.formula.is_none())
        .filter(|(_, cell)| {
            cell.value
                .as_str()
                .is_some_and(|text| normalize(text) == target)
        })
        .filter_map(|(addr, _)| addr.left())
        .collect();

    for addr in &hits {
        let token = CellValue::String(MARKER_TOKEN.to_string());
        sheet.set_value(*addr, token.clone());
        edits.push((*addr, token));
    }

    debug!(
        "Marker '{}' on sheet '{}': {} match(es)",
        field,
        sheet.name(),
        hits.len()
    );
    hits.len()
}
