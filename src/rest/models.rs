use serde::{Deserialize, Serialize};

use crate::types::Funko;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

/// One record or a whole collection, serialized without a wrapper tag so
/// the body matches the original service's `funkoPops` field.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunkoPayload {
    One(Funko),
    Many(Vec<Funko>),
}

/// Uniform response envelope. On failure `error` carries the machine
/// readable kind alongside the HTTP status code, so callers can tell a
/// missing record from a server fault.
#[derive(Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(rename = "funkoPops", skip_serializing_if = "Option::is_none")]
    pub funko_pops: Option<FunkoPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn ok() -> Self {
        Self {
            success: true,
            funko_pops: None,
            error: None,
            message: None,
        }
    }

    pub fn with_payload(payload: FunkoPayload) -> Self {
        Self {
            success: true,
            funko_pops: Some(payload),
            error: None,
            message: None,
        }
    }

    pub fn failure(kind: &str, message: String) -> Self {
        Self {
            success: false,
            funko_pops: None,
            error: Some(kind.to_string()),
            message: Some(message),
        }
    }
}
