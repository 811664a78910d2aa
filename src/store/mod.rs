//! Pharmacy record storage
//!
//! `PharmacyStore` is the CRUD surface used by the HTTP API; `RecordSource`
//! is the read-only capability handed to the template filler.

mod json_store;
mod pharmacy;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SheetResult;
use crate::types::Record;

pub use json_store::JsonStore;
pub use pharmacy::{Pharmacy, PharmacyFields};

/// CRUD access to pharmacy documents.
#[async_trait]
pub trait PharmacyStore: Send + Sync {
    /// All documents in insertion order.
    async fn list(&self) -> SheetResult<Vec<Pharmacy>>;

    async fn get(&self, id: Uuid) -> SheetResult<Option<Pharmacy>>;

    async fn create(&self, fields: PharmacyFields) -> SheetResult<Pharmacy>;

    /// Apply a partial update. `None` when no document has this id.
    async fn update(&self, id: Uuid, patch: PharmacyFields) -> SheetResult<Option<Pharmacy>>;
}

/// Bulk, read-only record fetch used by the template filler.
///
/// The returned order is significant: record `i` fills worksheet `i`.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_all(&self) -> SheetResult<Vec<Record>>;
}

/// Fixed record set, for offline filling and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticRecords(pub Vec<Record>);

#[async_trait]
impl RecordSource for StaticRecords {
    async fn fetch_all(&self) -> SheetResult<Vec<Record>> {
        Ok(self.0.clone())
    }
}
