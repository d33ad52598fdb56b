use std::sync::Arc;

use thiserror::Error;

use splitledger_core::{Amount, PrincipalId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The owner has not approved the spender for this much.
    #[error("insufficient allowance: approved {approved}, required {required}")]
    InsufficientAllowance { approved: Amount, required: Amount },

    #[error("insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Amount, required: Amount },

    /// The recipient or the medium refused the transfer.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// A movement of value, described well enough to run or undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Token {
        spender: PrincipalId,
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    },
    Native {
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    },
}

/// Moves value between two principals.
///
/// Each call is all-or-nothing: on `Err` no balance has changed.
pub trait ValueTransferGateway: Send + Sync {
    /// Token protocol: move `amount` from `from` to `to`, consuming the
    /// allowance `from` granted to `spender`.
    fn transfer_from(
        &self,
        spender: PrincipalId,
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    ) -> Result<(), GatewayError>;

    /// Forward native value attached by `from` to `to`.
    fn transfer_native(
        &self,
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    ) -> Result<(), GatewayError>;

    /// Undo a transfer this gateway completed: value goes back to `from` and
    /// a consumed allowance is restored. Recipients cannot refuse it.
    fn reverse(&self, transfer: &Transfer) -> Result<(), GatewayError>;

    fn execute(&self, transfer: &Transfer) -> Result<(), GatewayError> {
        match *transfer {
            Transfer::Token {
                spender,
                from,
                to,
                amount,
            } => self.transfer_from(spender, from, to, amount),
            Transfer::Native { from, to, amount } => self.transfer_native(from, to, amount),
        }
    }
}

impl<G> ValueTransferGateway for Arc<G>
where
    G: ValueTransferGateway + ?Sized,
{
    fn transfer_from(
        &self,
        spender: PrincipalId,
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    ) -> Result<(), GatewayError> {
        (**self).transfer_from(spender, from, to, amount)
    }

    fn transfer_native(
        &self,
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    ) -> Result<(), GatewayError> {
        (**self).transfer_native(from, to, amount)
    }

    fn reverse(&self, transfer: &Transfer) -> Result<(), GatewayError> {
        (**self).reverse(transfer)
    }
}
