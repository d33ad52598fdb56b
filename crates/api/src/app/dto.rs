use serde::Deserialize;
use serde_json::{Value, json};

use splitledger_core::{Amount, PrincipalId};
use splitledger_ledger::{DebtGraph, Expense, Group, NativeSettlement, NetPosition, NettedPair};

use crate::app::errors;

// Amounts travel as decimal strings: 18-decimal token units overflow the
// integer range most JSON clients can represent.

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub members: Vec<PrincipalId>,
}

#[derive(Debug, Deserialize)]
pub struct AddExpenseRequest {
    pub description: String,
    pub amount: String,
    pub participants: Vec<PrincipalId>,
}

#[derive(Debug, Deserialize)]
pub struct SettleDebtRequest {
    pub creditor: PrincipalId,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct NativeSettleRequest {
    pub creditor: PrincipalId,
    /// Native value attached to the payment.
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct WalletAmountRequest {
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// Defaults to the engine's service principal.
    pub spender: Option<PrincipalId>,
    pub amount: String,
}

// -------------------------
// Parsing helpers
// -------------------------

pub fn parse_amount(field: &'static str, raw: &str) -> Result<Amount, axum::response::Response> {
    raw.trim().parse::<Amount>().map_err(|_| {
        errors::json_error(
            axum::http::StatusCode::BAD_REQUEST,
            "invalid_amount_format",
            format!("{field} must be a non-negative integer string"),
        )
    })
}

// -------------------------
// Response mapping
// -------------------------

pub fn group_to_json(group: &Group) -> Value {
    json!({
        "group_id": group.id.value(),
        "name": group.name,
        "creator": group.creator.to_string(),
        "members": group.members().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "created_at": group.created_at.to_rfc3339(),
    })
}

pub fn expense_to_json(expense: &Expense) -> Value {
    json!({
        "expense_id": expense.id.value(),
        "group_id": expense.group_id.value(),
        "description": expense.description,
        "payer": expense.payer.to_string(),
        "amount": expense.amount.to_string(),
        "participants": expense.participants.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "share": expense.share.to_string(),
        "remainder": expense.remainder.to_string(),
        "recorded_at": expense.recorded_at.to_rfc3339(),
    })
}

pub fn graph_to_json(graph: &DebtGraph) -> Value {
    json!({
        "debtors": graph.debtors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "creditors": graph.creditors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "amounts": graph.amounts.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

pub fn position_to_json(position: &NetPosition) -> Value {
    json!({
        "member": position.member.to_string(),
        "owed_to_member": position.owed_to_member.to_string(),
        "owed_by_member": position.owed_by_member.to_string(),
    })
}

pub fn netted_to_json(pair: &NettedPair) -> Value {
    json!({
        "debtor": pair.debtor.to_string(),
        "creditor": pair.creditor.to_string(),
        "cancelled": pair.cancelled.to_string(),
        "residual": pair.residual.to_string(),
    })
}

pub fn native_settlement_to_json(outcome: &NativeSettlement) -> Value {
    json!({
        "applied": outcome.applied.to_string(),
        "refunded": outcome.refunded.to_string(),
    })
}
