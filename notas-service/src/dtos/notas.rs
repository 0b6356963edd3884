use crate::models::{Nota, NotaView};
use crate::services::kpi::Kpis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PagoRequest {
    pub monto: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotasResponse {
    pub batch_key: String,
    pub notas: Vec<NotaView>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nota: Option<Nota>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn accepted(nota: Nota) -> Self {
        Self {
            ok: true,
            nota: Some(nota),
            duplicate: None,
            error: None,
        }
    }

    pub fn duplicate(nota: Nota) -> Self {
        Self {
            ok: false,
            nota: Some(nota),
            duplicate: Some(true),
            error: Some("La nota ya fue entregada; no se puede sustituir".to_string()),
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            nota: None,
            duplicate: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KpisResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub kpis: Kpis,
}

#[derive(Debug, Serialize)]
pub struct FaltantesResponse {
    pub ok: bool,
    pub faltantes: Vec<NotaView>,
}
