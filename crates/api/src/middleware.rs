use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use splitledger_core::PrincipalId;

use crate::context::PrincipalContext;

/// Header carrying the acting principal's UUID.
pub const PRINCIPAL_HEADER: &str = "x-principal-id";

pub async fn principal_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let principal_id = extract_principal(req.headers())?;
    req.extensions_mut()
        .insert(PrincipalContext::new(principal_id));

    Ok(next.run(req).await)
}

fn extract_principal(headers: &HeaderMap) -> Result<PrincipalId, StatusCode> {
    let header = headers
        .get(PRINCIPAL_HEADER)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    header.parse().map_err(|_| StatusCode::UNAUTHORIZED)
}
