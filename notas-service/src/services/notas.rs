//! Nota lifecycle: upload with reconciliation against the current weekly
//! batch, delivery, payments, and the read-side aggregations. All mutations
//! run under the store's single-writer lock.

use crate::models::{Nota, NotaView};
use crate::services::{batch, credito, extraction, kpi, text};
use crate::services::{kpi::Kpis, repository::NotaStore, storage::Storage};
use chrono::{Duration, Utc};
use cobranza_core::error::AppError;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// What an upload did to the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// New record in the current batch.
    Created(Nota),
    /// Same original name re-uploaded before delivery; fields refreshed.
    Substituted(Nota),
    /// Same original name re-uploaded after delivery; rejected.
    Duplicate(Nota),
}

pub struct NotaService {
    store: NotaStore,
    storage: Arc<dyn Storage>,
}

impl NotaService {
    pub fn new(store: NotaStore, storage: Arc<dyn Storage>) -> Self {
        Self { store, storage }
    }

    /// Current-batch notas with derived credit fields, plus the batch key.
    pub async fn list(&self) -> Result<(String, Vec<NotaView>), AppError> {
        let now = Utc::now();
        let batch_key = batch::current_batch_key(now);
        let notas = self.store.load().await?;
        let views = notas
            .into_iter()
            .filter(|n| n.batch_key == batch_key)
            .map(|n| credito::to_view(n, now))
            .collect();
        Ok((batch_key, views))
    }

    /// Ingest an uploaded document into the current weekly batch.
    ///
    /// The original filename identifies the nota within its batch,
    /// case-insensitively. A repeat upload before delivery substitutes the
    /// document and refreshes the extracted fields; after delivery it is a
    /// duplicate and the record is left untouched.
    pub async fn upload(
        &self,
        original_name: &str,
        data: Vec<u8>,
    ) -> Result<UploadOutcome, AppError> {
        let now = Utc::now();
        let batch_key = batch::current_batch_key(now);

        let extracted = text::extract_text(&data);
        let cliente = extracted.as_deref().and_then(extraction::extract_cliente);
        let total = extracted.as_deref().and_then(extraction::extract_total);

        let name_key = original_name.to_lowercase();

        let _guard = self.store.lock().await;
        let mut notas = self.store.load().await?;

        let existing = notas
            .iter()
            .position(|n| n.batch_key == batch_key && n.original_name.to_lowercase() == name_key);

        if let Some(idx) = existing {
            if notas[idx].delivered_at.is_some() {
                info!(original_name, %batch_key, "Rejected upload for delivered nota");
                return Ok(UploadOutcome::Duplicate(notas[idx].clone()));
            }

            let nota = &mut notas[idx];
            nota.cliente = cliente;
            nota.total = total;
            nota.uploaded_at = now;
            if nota.filename.is_empty() {
                nota.filename = storage_key(&batch_key, &nota.id, original_name);
            }
            let filename = nota.filename.clone();
            let updated = nota.clone();

            self.storage.upload(&filename, data).await?;
            self.store.save(&notas).await?;
            info!(id = %updated.id, original_name, "Substituted nota document");
            return Ok(UploadOutcome::Substituted(updated));
        }

        let id = Uuid::new_v4().to_string();
        let filename = storage_key(&batch_key, &id, original_name);
        let nota = Nota {
            id,
            batch_key,
            original_name: original_name.to_string(),
            filename: filename.clone(),
            cliente,
            total,
            pagado: Decimal::ZERO,
            delivered_at: None,
            due_at: None,
            first_payment_at: None,
            uploaded_at: now,
        };

        self.storage.upload(&filename, data).await?;
        notas.push(nota.clone());
        self.store.save(&notas).await?;
        info!(id = %nota.id, original_name, "Created nota");
        Ok(UploadOutcome::Created(nota))
    }

    /// Mark a nota as delivered, opening its credit window. Idempotent: a
    /// second call leaves the original delivery and due dates in place.
    pub async fn deliver(&self, id: &str) -> Result<NotaView, AppError> {
        let now = Utc::now();

        let _guard = self.store.lock().await;
        let mut notas = self.store.load().await?;
        let idx = find(&notas, id)?;

        if notas[idx].delivered_at.is_none() {
            notas[idx].delivered_at = Some(now);
            notas[idx].due_at = Some(now + Duration::days(credito::PLAZO_DIAS));
            self.store.save(&notas).await?;
            info!(id, "Delivered nota");
        }

        Ok(credito::to_view(notas[idx].clone(), now))
    }

    /// Register a payment against a nota. Amounts accumulate; the first
    /// payment after delivery is timestamped.
    pub async fn pay(&self, id: &str, monto: Decimal) -> Result<NotaView, AppError> {
        if monto <= Decimal::ZERO {
            return Err(AppError::Validation(
                "El monto debe ser un número positivo".to_string(),
            ));
        }
        let now = Utc::now();

        let _guard = self.store.lock().await;
        let mut notas = self.store.load().await?;
        let idx = find(&notas, id)?;

        notas[idx].pagado += monto;
        if notas[idx].delivered_at.is_some() && notas[idx].first_payment_at.is_none() {
            notas[idx].first_payment_at = Some(now);
        }
        self.store.save(&notas).await?;
        info!(id, %monto, "Registered payment");

        Ok(credito::to_view(notas[idx].clone(), now))
    }

    pub async fn kpis(&self) -> Result<Kpis, AppError> {
        let notas = self.store.load().await?;
        Ok(kpi::compute_kpis(&notas))
    }

    pub async fn faltantes(&self) -> Result<Vec<NotaView>, AppError> {
        let notas = self.store.load().await?;
        Ok(kpi::rank_faltantes(&notas, Utc::now()))
    }

    /// Fetch the stored document behind a nota.
    pub async fn document(&self, id: &str) -> Result<(String, Vec<u8>), AppError> {
        let notas = self.store.load().await?;
        let idx = find(&notas, id)?;
        let data = self.storage.download(&notas[idx].filename).await?;
        Ok((notas[idx].original_name.clone(), data))
    }
}

fn find(notas: &[Nota], id: &str) -> Result<usize, AppError> {
    notas
        .iter()
        .position(|n| n.id == id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Nota {} not found", id)))
}

/// Stable blob key for a nota's document. The original name is sanitized so
/// the key is safe as a filesystem path component.
fn storage_key(batch_key: &str, id: &str, original_name: &str) -> String {
    format!(
        "{}__{}__{}",
        batch_key,
        id,
        sanitize_filename(original_name)
    )
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() => c,
            '_' | '.' | '-' | '(' | ')' | ' ' => c,
            '\u{C0}'..='\u{FF}' => c,
            _ => '_',
        })
        .collect()
}
