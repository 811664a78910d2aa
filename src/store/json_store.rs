//! Document store kept in memory and optionally persisted as a JSON file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Pharmacy, PharmacyFields, PharmacyStore, RecordSource};
use crate::error::{SheetError, SheetResult};
use crate::types::Record;

pub struct JsonStore {
    path: Option<PathBuf>,
    docs: RwLock<Vec<Pharmacy>>,
}

impl JsonStore {
    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::with_documents(Vec::new())
    }

    pub fn with_documents(docs: Vec<Pharmacy>) -> Self {
        Self {
            path: None,
            docs: RwLock::new(docs),
        }
    }

    /// Open a file-backed store. A missing file starts an empty collection.
    pub async fn open<P: AsRef<Path>>(path: P) -> SheetResult<Self> {
        let path = path.as_ref().to_path_buf();

        let docs: Vec<Pharmacy> = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read(&path).await?;
            serde_json::from_slice(&raw)?
        } else {
            Vec::new()
        };

        info!(
            "Loaded {} pharmacies from {}",
            docs.len(),
            path.display()
        );

        Ok(Self {
            path: Some(path),
            docs: RwLock::new(docs),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, docs: &[Pharmacy]) -> SheetResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        // Write then rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        let payload = serde_json::to_vec_pretty(docs)?;
        let persist_err =
            |e: std::io::Error| SheetError::Store(format!("{}: {}", path.display(), e));
        tokio::fs::write(&tmp, payload).await.map_err(persist_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(persist_err)?;
        debug!("Persisted {} pharmacies to {}", docs.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl PharmacyStore for JsonStore {
    async fn list(&self) -> SheetResult<Vec<Pharmacy>> {
        Ok(self.docs.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> SheetResult<Option<Pharmacy>> {
        Ok(self.docs.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, fields: PharmacyFields) -> SheetResult<Pharmacy> {
        let mut docs = self.docs.write().await;
        let pharmacy = Pharmacy::new(fields);

        // Memory changes only once the file write went through
        let mut next = docs.clone();
        next.push(pharmacy.clone());
        self.persist(&next).await?;
        *docs = next;
        Ok(pharmacy)
    }

    async fn update(&self, id: Uuid, patch: PharmacyFields) -> SheetResult<Option<Pharmacy>> {
        let mut docs = self.docs.write().await;
        let Some(index) = docs.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        let mut next = docs.clone();
        next[index].fields.apply(patch);
        let updated = next[index].clone();
        self.persist(&next).await?;
        *docs = next;
        Ok(Some(updated))
    }
}

#[async_trait]
impl RecordSource for JsonStore {
    async fn fetch_all(&self) -> SheetResult<Vec<Record>> {
        Ok(self
            .docs
            .read()
            .await
            .iter()
            .map(Pharmacy::to_record)
            .collect())
    }
}
