use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use splitledger_core::{GroupId, PrincipalId};

use crate::app::services::{self, AppServices};
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_group))
        .route("/count", get(group_count))
        .route("/:id", get(get_group))
        .route("/:id/join", post(join_group))
        .route("/:id/members", get(list_members))
        .route("/:id/members/:principal", get(is_member))
        .route("/:id/expenses", post(add_expense).get(list_expenses))
        .route("/:id/simplify", post(simplify_debts))
        .route("/:id/debts/:debtor/:creditor", get(get_debt))
        .route("/:id/graph", get(debt_graph))
        .route("/:id/positions", get(positions))
        .route("/:id/settlements", post(settle_debt))
        .route("/:id/settlements/native", post(settle_debt_native))
        .route("/:id/history", get(history))
        .route("/:id/events", get(events))
}

pub async fn create_group(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateGroupRequest>,
) -> axum::response::Response {
    match services
        .engine()
        .create_group(principal.principal_id(), body.name, &body.members)
    {
        Ok(group_id) => (
            StatusCode::CREATED,
            Json(json!({ "group_id": group_id.value() })),
        )
            .into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn group_count(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(json!({ "count": services.engine().group_count() }))
}

pub async fn get_group(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    match services.engine().group(GroupId::new(id)) {
        Ok(group) => (StatusCode::OK, Json(dto::group_to_json(&group))).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn join_group(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    match services
        .engine()
        .join_group(GroupId::new(id), principal.principal_id())
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "group_id": id,
                "member": principal.principal_id().to_string(),
            })),
        )
            .into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn list_members(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    match services.engine().members(GroupId::new(id)) {
        Ok(members) => {
            let items = members.iter().map(ToString::to_string).collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "items": items }))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn is_member(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, principal)): Path<(u64, PrincipalId)>,
) -> impl IntoResponse {
    Json(json!({ "member": services.engine().is_member(GroupId::new(id), principal) }))
}

pub async fn add_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<u64>,
    Json(body): Json<dto::AddExpenseRequest>,
) -> axum::response::Response {
    let amount = match dto::parse_amount("amount", &body.amount) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.engine().add_expense(
        GroupId::new(id),
        principal.principal_id(),
        body.description,
        amount,
        &body.participants,
    ) {
        Ok(expense) => (StatusCode::CREATED, Json(dto::expense_to_json(&expense))).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    match services.engine().expenses(GroupId::new(id)) {
        Ok(expenses) => {
            let items = expenses.iter().map(dto::expense_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "items": items }))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn simplify_debts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    match services
        .engine()
        .simplify_debts(GroupId::new(id), principal.principal_id())
    {
        Ok(netted) => {
            let items = netted.iter().map(dto::netted_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "netted": items }))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn get_debt(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, debtor, creditor)): Path<(u64, PrincipalId, PrincipalId)>,
) -> impl IntoResponse {
    let amount = services
        .engine()
        .get_debt(GroupId::new(id), debtor, creditor);
    Json(json!({
        "debtor": debtor.to_string(),
        "creditor": creditor.to_string(),
        "amount": amount.to_string(),
    }))
}

pub async fn debt_graph(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    Json(dto::graph_to_json(&services.engine().debt_graph(GroupId::new(id))))
}

pub async fn positions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    match services.engine().positions(GroupId::new(id)) {
        Ok(positions) => {
            let items = positions.iter().map(dto::position_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "items": items }))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn settle_debt(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<u64>,
    Json(body): Json<dto::SettleDebtRequest>,
) -> axum::response::Response {
    let amount = match dto::parse_amount("amount", &body.amount) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let group_id = GroupId::new(id);
    let debtor = principal.principal_id();

    match services
        .engine()
        .settle_debt(group_id, debtor, body.creditor, amount)
    {
        Ok(()) => {
            let remaining = services.engine().get_debt(group_id, debtor, body.creditor);
            (
                StatusCode::OK,
                Json(json!({
                    "settled": amount.to_string(),
                    "remaining": remaining.to_string(),
                })),
            )
                .into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn settle_debt_native(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<u64>,
    Json(body): Json<dto::NativeSettleRequest>,
) -> axum::response::Response {
    let value = match dto::parse_amount("value", &body.value) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.engine().settle_debt_native(
        GroupId::new(id),
        principal.principal_id(),
        body.creditor,
        value,
    ) {
        Ok(outcome) => (StatusCode::OK, Json(dto::native_settlement_to_json(&outcome))).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    match services.engine().history(GroupId::new(id)) {
        Ok(records) => {
            let items = records
                .iter()
                .map(|r| {
                    json!({
                        "event_id": r.event_id().to_string(),
                        "sequence_number": r.sequence_number(),
                        "event_type": r.event_type(),
                        "recorded_at": r.recorded_at().to_rfc3339(),
                        "payload": serde_json::to_value(r.payload()).unwrap_or_default(),
                    })
                })
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "items": items }))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

/// Live feed of the group's committed events (server-sent events).
pub async fn events(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    let group_id = GroupId::new(id);
    if let Err(e) = services.engine().group(group_id) {
        return errors::engine_error_to_response(e);
    }
    services::group_sse_stream(services, group_id).into_response()
}
