use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    storage::Storage,
    types::{Funko, StoreError},
};

use super::{
    models::{Envelope, FunkoPayload, HealthResponse},
    AppState,
};

/// The CRUD operation requested through the `peticion` query parameter.
/// The original service multiplexed all four through GET, so the handler
/// keys on this parameter rather than the HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OperationKind {
    Get,
    Post,
    Delete,
    Patch,
}

impl FromStr for OperationKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(OperationKind::Get),
            "post" => Ok(OperationKind::Post),
            "delete" => Ok(OperationKind::Delete),
            "patch" => Ok(OperationKind::Patch),
            other => Err(StoreError::Validation(format!(
                "unknown peticion {other:?}, expected get, post, delete or patch"
            ))),
        }
    }
}

pub async fn health<S: Storage + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn funkos<S: Storage + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    match dispatch(&state, &params) {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(err) => {
            match &err {
                StoreError::Validation(msg) => {
                    log::warn!("Rejected /funkos request: {}", msg);
                }
                StoreError::Io(_) | StoreError::Connection(_) => {
                    log::error!("Storage failure serving /funkos: {}", err);
                }
                _ => {}
            }
            (
                error_status(&err),
                Json(Envelope::failure(err.kind(), err.to_string())),
            )
                .into_response()
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(Envelope::failure("NOT_FOUND", "endpoint not found".to_string())),
    )
}

fn dispatch<S: Storage>(
    state: &AppState<S>,
    params: &HashMap<String, String>,
) -> Result<Envelope, StoreError> {
    let op = OperationKind::from_str(required(params, "peticion")?)?;
    let owner = required(params, "usuario")?;

    match op {
        OperationKind::Get => match required(params, "operacion")? {
            "1" => Ok(Envelope::with_payload(FunkoPayload::Many(
                state.service.list(owner)?,
            ))),
            "2" => {
                let id = required_u32(params, "id")?;
                Ok(Envelope::with_payload(FunkoPayload::One(
                    state.service.fetch(owner, id)?,
                )))
            }
            other => Err(StoreError::Validation(format!(
                "unknown operacion {other:?}, expected \"1\" (list) or \"2\" (fetch)"
            ))),
        },
        OperationKind::Post => {
            let funko = funko_from_params(params)?;
            state.service.add(owner, funko)?;
            Ok(Envelope::ok())
        }
        OperationKind::Delete => {
            let id = required_u32(params, "id")?;
            state.service.remove(owner, id)?;
            Ok(Envelope::ok())
        }
        OperationKind::Patch => {
            let funko = funko_from_params(params)?;
            state.service.update(owner, funko)?;
            Ok(Envelope::ok())
        }
    }
}

fn error_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound { .. } | StoreError::OwnerNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::AlreadyExists { .. } => StatusCode::CONFLICT,
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::Io(_) | StoreError::Connection(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn required<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, StoreError> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| StoreError::Validation(format!("missing parameter {key}")))
}

fn required_u32(params: &HashMap<String, String>, key: &str) -> Result<u32, StoreError> {
    required(params, key)?
        .parse()
        .map_err(|_| StoreError::Validation(format!("parameter {key} must be a non-negative integer")))
}

fn required_f64(params: &HashMap<String, String>, key: &str) -> Result<f64, StoreError> {
    let value: f64 = required(params, key)?
        .parse()
        .map_err(|_| StoreError::Validation(format!("parameter {key} must be a number")))?;
    // f64::from_str accepts "NaN" and "inf"; neither is a market value.
    if !value.is_finite() {
        return Err(StoreError::Validation(format!(
            "parameter {key} must be a finite number"
        )));
    }
    Ok(value)
}

fn required_bool(params: &HashMap<String, String>, key: &str) -> Result<bool, StoreError> {
    match required(params, key)? {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(StoreError::Validation(format!(
            "parameter {key} must be true or false"
        ))),
    }
}

fn funko_from_params(params: &HashMap<String, String>) -> Result<Funko, StoreError> {
    // The original wire contract requires `fichero` on post/patch. It is
    // validated for presence but no longer controls storage layout; record
    // files are keyed by id.
    required(params, "fichero")?;

    Ok(Funko {
        id: required_u32(params, "id")?,
        name: required(params, "nombre")?.to_string(),
        description: required(params, "descripcion")?.to_string(),
        category: required(params, "tipo")?.to_string(),
        genre: required(params, "genero")?.to_string(),
        franchise: required(params, "franquicia")?.to_string(),
        number: required_u32(params, "numero")?,
        is_exclusive: required_bool(params, "exclusivo")?,
        special_features: required(params, "caracteristicas_especiales")?.to_string(),
        market_value: required_f64(params, "valor_mercado")?,
    })
}
