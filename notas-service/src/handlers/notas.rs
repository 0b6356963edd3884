use crate::dtos::{
    FaltantesResponse, KpisResponse, ListNotasResponse, PagoRequest, UploadResponse,
};
use crate::services::UploadOutcome;
use crate::startup::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use cobranza_core::error::AppError;
use tracing::instrument;

#[instrument(skip(state))]
pub async fn list_notas(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (batch_key, notas) = state.notas.list().await?;
    Ok(Json(ListNotasResponse { batch_key, notas }))
}

/// Accepts a multipart form with a single `file` part holding the document.
#[instrument(skip(state, multipart))]
pub async fn upload_nota(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("nota").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?;
            file = Some((name, data.to_vec()));
        }
    }

    let Some((original_name, data)) = file else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(UploadResponse::rejected("Falta el archivo de la nota")),
        ));
    };
    if data.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(UploadResponse::rejected("El archivo está vacío")),
        ));
    }

    match state.notas.upload(&original_name, data).await? {
        UploadOutcome::Created(nota) => {
            Ok((StatusCode::CREATED, Json(UploadResponse::accepted(nota))))
        }
        UploadOutcome::Substituted(nota) => Ok((StatusCode::OK, Json(UploadResponse::accepted(nota)))),
        UploadOutcome::Duplicate(nota) => {
            Ok((StatusCode::CONFLICT, Json(UploadResponse::duplicate(nota))))
        }
    }
}

#[instrument(skip(state))]
pub async fn deliver_nota(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.notas.deliver(&id).await?;
    Ok(Json(view))
}

#[instrument(skip(state, payload))]
pub async fn register_pago(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PagoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.notas.pay(&id, payload.monto).await?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn get_kpis(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let kpis = state.notas.kpis().await?;
    Ok(Json(KpisResponse { ok: true, kpis }))
}

#[instrument(skip(state))]
pub async fn get_faltantes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let faltantes = state.notas.faltantes().await?;
    Ok(Json(FaltantesResponse {
        ok: true,
        faltantes,
    }))
}

#[instrument(skip(state))]
pub async fn download_documento(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (original_name, data) = state.notas.document(&id).await?;
    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", original_name.replace('"', "")),
        ),
    ];
    Ok((headers, data))
}
