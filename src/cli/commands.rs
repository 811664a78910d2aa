use crate::error::{SheetError, SheetResult};
use crate::excel::{extract_labels, fill_with_records, TemplateLayout, Workbook};
use crate::types::Record;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Bookkeeping keys a stored document may carry that never go into a sheet
const DOCUMENT_KEYS: [&str; 2] = ["_id", "__v"];

/// Execute the labels command
pub fn labels(input: PathBuf) -> SheetResult<()> {
    println!("{}", "🏷️  Pharmacy Sheets - Template Labels".bold().green());
    println!("   File: {}\n", input.display());

    let bytes = std::fs::read(&input)?;
    let labels = extract_labels(&bytes)?;

    if labels.is_empty() {
        println!(
            "{}",
            "⚠️  No labeled cells found. Labels are cells whose text starts with '@'".yellow()
        );
        return Ok(());
    }

    let mut current_sheet: Option<&str> = None;
    for label in &labels {
        if current_sheet != Some(label.sheet_name.as_str()) {
            println!("   📄 Sheet: {}", label.sheet_name.bright_blue().bold());
            current_sheet = Some(label.sheet_name.as_str());
        }
        println!(
            "      {:<8} {}",
            label.cell.to_string().cyan(),
            label.field_name()
        );
    }

    println!();
    println!(
        "{}",
        format!("✅ Found {} label(s)", labels.len()).bold().green()
    );
    Ok(())
}

/// Execute the fill command
pub fn fill(
    input: PathBuf,
    records_path: PathBuf,
    markers: Vec<String>,
    output: PathBuf,
    verbose: bool,
) -> SheetResult<()> {
    println!("{}", "💊 Pharmacy Sheets - Fill Template".bold().green());
    println!("   Template: {}", input.display());
    println!("   Records:  {}", records_path.display());
    println!("   Output:   {}\n", output.display());

    let bytes = std::fs::read(&input)?;
    let labels = extract_labels(&bytes)?;
    if labels.is_empty() {
        return Err(SheetError::NoLabelsFound);
    }

    let records = load_records(&records_path)?;

    if verbose {
        let workbook = Workbook::from_bytes(&bytes)?;
        let sheet_count = workbook.sheets().len();
        let template = workbook
            .template_sheet()
            .map(|s| s.name().to_string())
            .unwrap_or_default();
        let layout = TemplateLayout::from_labels(&template, &labels);

        println!("{}", "📖 Reading template...".cyan());
        println!(
            "   {} sheet(s), {} field(s) mapped on '{}'",
            sheet_count,
            layout.len(),
            template
        );
        println!("   {} record(s) loaded", records.len());
        if records.len() < sheet_count {
            println!(
                "   {}",
                format!(
                    "{} sheet(s) have no record and stay as they are",
                    sheet_count - records.len()
                )
                .yellow()
            );
        }
        if !markers.is_empty() {
            println!("   Marker fields: {}", markers.join(", ").bright_yellow());
        }
        println!();
    }

    let (filled, summary) = fill_with_records(&bytes, &labels, &records, &markers)?;
    std::fs::write(&output, filled)?;

    println!("{}", "✅ Fill Complete!".bold().green());
    println!("   Sheets filled: {}", summary.sheets_filled);
    println!("   Cells written: {}", summary.cells_written);
    println!("   Cells marked:  {}", summary.cells_marked);
    println!("   Excel file: {}\n", output.display());
    Ok(())
}

/// Read records from a JSON or YAML array of objects.
///
/// The format follows the extension (`.yaml` / `.yml`, anything else is
/// JSON). Document bookkeeping keys are dropped from every record.
pub fn load_records(path: &Path) -> SheetResult<Vec<Record>> {
    let raw = std::fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let mut records: Vec<Record> = if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };

    for record in &mut records {
        for key in DOCUMENT_KEYS {
            record.remove(key);
        }
    }

    if records.is_empty() {
        return Err(SheetError::NoData);
    }
    Ok(records)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
