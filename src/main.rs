use clap::{Parser, Subcommand};
use pharmacy_sheets::cli;
use pharmacy_sheets::error::SheetResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pharmacy-sheets")]
#[command(about = "Fill pharmacy survey templates from stored records")]
#[command(long_about = "Pharmacy Sheets - survey template filler

A template is an .xlsx workbook whose cells contain '@field' labels, e.g. a
cell with '@phone' receives the record's phone value. Worksheet 1 is filled
from record 1, worksheet 2 from record 2, and so on.

COMMANDS:
  labels  - List the '@field' labels of a template
  fill    - Fill a template from a JSON or YAML record file

EXAMPLES:
  pharmacy-sheets labels survey.xlsx
  pharmacy-sheets fill survey.xlsx --records pharmacies.json -o filled.xlsx
  pharmacy-sheets fill survey.xlsx -r data.yaml --markers experience,position -o out.xlsx

The HTTP service is a separate binary: pharmacy-server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the '@field' labels found in a template workbook
    Labels {
        /// Path to the template (.xlsx)
        input: PathBuf,
    },

    #[command(long_about = "Fill a template workbook with records.

Every worksheet uses the label layout of the first worksheet. Sheets beyond
the number of records are left as they are; extra records are ignored.

MARKER FIELDS:
  For each field named with --markers, every cell whose text equals the
  record's answer (ignoring case, whitespace runs and dash style) gets a
  '1' in the cell to its left. Useful for tick-box style survey sheets.

RECORD FILE:
  A JSON (or .yaml/.yml) array of objects. '_id' and '__v' keys are ignored.")]
    /// Fill a template workbook from a record file
    Fill {
        /// Path to the template (.xlsx)
        input: PathBuf,

        /// JSON or YAML file with an array of records
        #[arg(short, long)]
        records: PathBuf,

        /// Fields whose answers are ticked in the sheet (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        markers: Vec<String>,

        /// Output Excel file path (.xlsx)
        #[arg(short, long)]
        output: PathBuf,

        /// Show verbose fill steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> SheetResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Labels { input } => cli::labels(input),

        Commands::Fill {
            input,
            records,
            markers,
            output,
            verbose,
        } => {
            let markers = markers
                .into_iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            cli::fill(input, records, markers, output, verbose)
        }
    }
}
