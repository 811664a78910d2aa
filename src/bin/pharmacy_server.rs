//! Pharmacy API Server binary
//!
//! HTTP REST API for pharmacy survey records and template filling.

use std::path::PathBuf;

use clap::Parser;
use pharmacy_sheets::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "pharmacy-server")]
#[command(version)]
#[command(about = "Pharmacy API Server - survey records and Excel template filling")]
#[command(long_about = r#"
Pharmacy API Server

Endpoints:
  - POST  /api/excel/upload       - Fill an uploaded .xlsx template with every pharmacy
  - GET   /api/pharmacies         - List pharmacies
  - POST  /api/pharmacies         - Create a pharmacy
  - GET   /api/pharmacies/:id     - Fetch one pharmacy
  - PATCH /api/pharmacies/:id     - Update a pharmacy
  - GET   /health                 - Health check

The upload takes a multipart body with a 'file' part and optional
'markerFieldNames' parts (or ?markerFieldNames=a,b on the URL).

Example usage:
  pharmacy-server                                  # localhost:3000, in-memory store
  pharmacy-server --port 8080 --data pharmacies.json

  curl -F file=@survey.xlsx -F markerFieldNames=experience,position \
    http://localhost:3000/api/excel/upload -o filled.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PHARMACY_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "PHARMACY_PORT")]
    port: u16,

    /// JSON file holding the pharmacy collection (in-memory when omitted)
    #[arg(short, long, env = "PHARMACY_DATA")]
    data: Option<PathBuf>,

    /// Largest accepted upload body, in megabytes
    #[arg(long, default_value = "20")]
    max_upload_mb: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        data_path: args.data,
        max_upload_bytes: args.max_upload_mb * 1024 * 1024,
    };

    run_api_server(config).await
}
