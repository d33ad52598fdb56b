use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use splitledger_core::{ErrorClass, LedgerError};
use splitledger_infra::EngineError;

pub fn engine_error_to_response(err: EngineError) -> axum::response::Response {
    let status = match &err {
        EngineError::Ledger(e) => ledger_status(e),
        EngineError::Poisoned(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Journal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, err.kind(), err.to_string())
}

fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::UnknownGroup(_) => StatusCode::NOT_FOUND,
        LedgerError::AlreadyMember { .. } => StatusCode::CONFLICT,
        other => match other.class() {
            ErrorClass::Validation => StatusCode::BAD_REQUEST,
            ErrorClass::Authorization => StatusCode::FORBIDDEN,
            ErrorClass::State => StatusCode::CONFLICT,
            ErrorClass::Collaborator => StatusCode::BAD_GATEWAY,
        },
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
