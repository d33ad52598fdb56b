//! Dev wallet over the in-memory value gateway.
//!
//! Issuance here is unrestricted; these routes exist so a local server can be
//! exercised end to end without an external token.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(balances))
        .route("/mint", post(mint))
        .route("/approve", post(approve))
        .route("/deposit", post(deposit))
}

pub async fn balances(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> impl IntoResponse {
    let who = principal.principal_id();
    let wallet = services.wallet();
    let service = services.engine().config().service_principal;
    Json(json!({
        "principal": who.to_string(),
        "service_principal": service.to_string(),
        "token_balance": wallet.balance_of(who).to_string(),
        "native_balance": wallet.native_balance_of(who).to_string(),
        "service_allowance": wallet.allowance(who, service).to_string(),
    }))
}

pub async fn mint(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::WalletAmountRequest>,
) -> axum::response::Response {
    let amount = match dto::parse_amount("amount", &body.amount) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.wallet().mint(principal.principal_id(), amount) {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({ "token_balance": balance.to_string() })),
        )
            .into_response(),
        Err(e) => errors::json_error(StatusCode::BAD_REQUEST, "wallet_rejected", e.to_string()),
    }
}

pub async fn approve(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::ApproveRequest>,
) -> axum::response::Response {
    let amount = match dto::parse_amount("amount", &body.amount) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let spender = body
        .spender
        .unwrap_or(services.engine().config().service_principal);
    services
        .wallet()
        .approve(principal.principal_id(), spender, amount);

    (
        StatusCode::OK,
        Json(json!({
            "spender": spender.to_string(),
            "allowance": amount.to_string(),
        })),
    )
        .into_response()
}

pub async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::WalletAmountRequest>,
) -> axum::response::Response {
    let amount = match dto::parse_amount("amount", &body.amount) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .wallet()
        .deposit_native(principal.principal_id(), amount)
    {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({ "native_balance": balance.to_string() })),
        )
            .into_response(),
        Err(e) => errors::json_error(StatusCode::BAD_REQUEST, "wallet_rejected", e.to_string()),
    }
}
