//! JSON-file record repository. The full record set is loaded and written
//! back as a unit. Every mutating operation holds the single-writer lock
//! across its whole load-mutate-save sequence, and saves go through a temp
//! file plus rename so a crashed write never leaves a half-applied store.

use crate::models::Nota;
use cobranza_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};

pub struct NotaStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl NotaStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Take the single-writer lock. Mutating callers hold the guard across
    /// their whole load-mutate-save sequence.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Load the full record set; a missing file reads as an empty set.
    pub async fn load(&self) -> Result<Vec<Nota>, AppError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::Storage(anyhow::anyhow!("Corrupt record store: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(AppError::from(e)),
        }
    }

    /// Write the full record set back, atomically.
    pub async fn save(&self, notas: &[Nota]) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(notas).map_err(|e| {
            AppError::Storage(anyhow::anyhow!("Failed to encode record store: {}", e))
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn nota(id: &str) -> Nota {
        Nota {
            id: id.to_string(),
            batch_key: "2026-03-02".to_string(),
            original_name: format!("{id}.pdf"),
            filename: format!("2026-03-02__{id}__{id}.pdf"),
            cliente: Some("Comercial Gómez".to_string()),
            total: Some(Decimal::new(123456, 2)),
            pagado: Decimal::ZERO,
            delivered_at: None,
            due_at: None,
            first_payment_at: None,
            uploaded_at: Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = NotaStore::new(dir.path().join("notas.json")).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = NotaStore::new(dir.path().join("notas.json")).await.unwrap();

        let notas = vec![nota("a"), nota("b")];
        store.save(&notas).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "a");
        assert_eq!(loaded[0].cliente.as_deref(), Some("Comercial Gómez"));
        // No leftover temp file after the rename.
        assert!(!dir.path().join("notas.json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_store_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notas.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();
        let store = NotaStore::new(&path).await.unwrap();
        assert!(store.load().await.is_err());
    }
}
