//! Pharmacy API Server module
//!
//! Provides the HTTP REST API: template upload and pharmacy CRUD.
//! Run with `pharmacy-server`.

pub mod error;
pub mod handlers;
pub mod server;

pub use server::{bind_listener, router, run_api_server, ApiConfig, AppState};
