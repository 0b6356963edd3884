//! Nota model for notas-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Credit status, derived from the stored fields plus the current time.
/// Never persisted; recomputed on every read so it cannot drift from its
/// inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditStatus {
    PreEntrega,
    EnPlazo,
    PorVencer,
    Vencido,
    Liquidado,
}

impl CreditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditStatus::PreEntrega => "PRE_ENTREGA",
            CreditStatus::EnPlazo => "EN_PLAZO",
            CreditStatus::PorVencer => "POR_VENCER",
            CreditStatus::Vencido => "VENCIDO",
            CreditStatus::Liquidado => "LIQUIDADO",
        }
    }

    /// Follow-up urgency used by the faltantes ranking; lower sorts first.
    pub fn urgency_rank(&self) -> u8 {
        match self {
            CreditStatus::Vencido => 0,
            CreditStatus::PorVencer => 1,
            CreditStatus::EnPlazo => 2,
            CreditStatus::PreEntrega | CreditStatus::Liquidado => 3,
        }
    }
}

/// Invoice record ("nota"), owned by the record repository and mutated only
/// through the service operations.
///
/// `id`, `batch_key` and `original_name` never change after creation;
/// `delivered_at`/`due_at` are set together exactly once; `pagado` only
/// grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nota {
    pub id: String,
    pub batch_key: String,
    pub original_name: String,
    pub filename: String,
    pub cliente: Option<String>,
    pub total: Option<Decimal>,
    pub pagado: Decimal,
    pub delivered_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub first_payment_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
}

/// Wire representation of a nota, including the derived credit fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotaView {
    #[serde(flatten)]
    pub nota: Nota,
    pub saldo: Option<Decimal>,
    pub status_credito: CreditStatus,
}
