//! Settlement planning: how much debt a payment retires.
//!
//! Moving the value itself is the caller's job (see the infra gateway); this
//! module only decides amounts.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use splitledger_core::{Amount, LedgerError, LedgerResult};

/// Medium the debtor pays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementMethod {
    /// Fungible ledger token, pulled via a prior allowance.
    Token,
    /// Native currency attached to the call.
    Native,
}

/// What to do when attached native value exceeds the debt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverpaymentPolicy {
    /// Retire the whole debt and hand the excess back.
    #[default]
    Refund,
    /// Refuse the settlement outright.
    Reject,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown overpayment policy '{0}' (expected refund|reject)")]
pub struct UnknownPolicy(pub String);

impl FromStr for OverpaymentPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refund" => Ok(Self::Refund),
            "reject" => Ok(Self::Reject),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// Outcome of a native-currency settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeSettlement {
    /// Debt retired and value forwarded to the creditor.
    pub applied: Amount,
    /// Value handed back to the debtor.
    pub refunded: Amount,
}

/// Token settlement must be positive and within the current debt.
pub fn check_token_settlement(amount: Amount, owed: Amount) -> LedgerResult<()> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }
    if amount > owed {
        return Err(LedgerError::InsufficientDebt {
            requested: amount,
            owed,
        });
    }
    Ok(())
}

/// `applied = min(attached, owed)`, the rest refunded or rejected per `policy`.
pub fn plan_native_settlement(
    attached: Amount,
    owed: Amount,
    policy: OverpaymentPolicy,
) -> LedgerResult<NativeSettlement> {
    if attached == 0 {
        return Err(LedgerError::InvalidAmount);
    }
    if attached > owed && policy == OverpaymentPolicy::Reject {
        return Err(LedgerError::Overpayment { attached, owed });
    }

    let applied = attached.min(owed);
    Ok(NativeSettlement {
        applied,
        refunded: attached - applied,
    })
}
