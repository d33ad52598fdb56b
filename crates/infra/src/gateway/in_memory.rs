use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use splitledger_core::{Amount, PrincipalId};

use super::r#trait::{GatewayError, Transfer, ValueTransferGateway};

#[derive(Debug, Default)]
struct Balances {
    tokens: HashMap<PrincipalId, Amount>,
    allowances: HashMap<(PrincipalId, PrincipalId), Amount>,
    native: HashMap<PrincipalId, Amount>,
    refusing: HashSet<PrincipalId>,
}

impl Balances {
    fn credit(
        map: &HashMap<PrincipalId, Amount>,
        who: PrincipalId,
        amount: Amount,
    ) -> Result<Amount, GatewayError> {
        map.get(&who)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or_else(|| GatewayError::Rejected(format!("balance of {who} would overflow")))
    }

    fn debit(
        map: &HashMap<PrincipalId, Amount>,
        who: PrincipalId,
        amount: Amount,
    ) -> Result<Amount, GatewayError> {
        let available = map.get(&who).copied().unwrap_or(0);
        available
            .checked_sub(amount)
            .ok_or(GatewayError::InsufficientBalance {
                available,
                required: amount,
            })
    }

    fn ensure_accepts(&self, to: PrincipalId) -> Result<(), GatewayError> {
        if self.refusing.contains(&to) {
            return Err(GatewayError::Rejected(format!("{to} refuses incoming transfers")));
        }
        Ok(())
    }
}

/// In-memory token + native wallet, for tests and the dev server.
///
/// Issuance (`mint`, `deposit_native`) is unrestricted here; real token policy
/// lives outside the ledger.
#[derive(Debug, Default)]
pub struct InMemoryValueGateway {
    inner: Mutex<Balances>,
}

impl InMemoryValueGateway {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation below validates fully before writing, so a poisoned
    // lock never holds half-applied balances.
    fn state(&self) -> MutexGuard<'_, Balances> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mint(&self, to: PrincipalId, amount: Amount) -> Result<Amount, GatewayError> {
        let mut state = self.state();
        let next = Balances::credit(&state.tokens, to, amount)?;
        state.tokens.insert(to, next);
        Ok(next)
    }

    /// Set (not add to) the allowance `owner` grants `spender`.
    pub fn approve(&self, owner: PrincipalId, spender: PrincipalId, amount: Amount) {
        self.state().allowances.insert((owner, spender), amount);
    }

    pub fn deposit_native(&self, to: PrincipalId, amount: Amount) -> Result<Amount, GatewayError> {
        let mut state = self.state();
        let next = Balances::credit(&state.native, to, amount)?;
        state.native.insert(to, next);
        Ok(next)
    }

    /// Make `who` reject every incoming transfer (or accept again).
    pub fn set_refusing(&self, who: PrincipalId, refusing: bool) {
        let mut state = self.state();
        if refusing {
            state.refusing.insert(who);
        } else {
            state.refusing.remove(&who);
        }
    }

    pub fn balance_of(&self, who: PrincipalId) -> Amount {
        self.state().tokens.get(&who).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: PrincipalId, spender: PrincipalId) -> Amount {
        self.state()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn native_balance_of(&self, who: PrincipalId) -> Amount {
        self.state().native.get(&who).copied().unwrap_or(0)
    }
}

impl ValueTransferGateway for InMemoryValueGateway {
    fn transfer_from(
        &self,
        spender: PrincipalId,
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.ensure_accepts(to)?;

        let approved = state.allowances.get(&(from, spender)).copied().unwrap_or(0);
        if approved < amount {
            return Err(GatewayError::InsufficientAllowance {
                approved,
                required: amount,
            });
        }

        let from_after = Balances::debit(&state.tokens, from, amount)?;
        if from == to {
            state.allowances.insert((from, spender), approved - amount);
            return Ok(());
        }
        let to_after = Balances::credit(&state.tokens, to, amount)?;

        state.allowances.insert((from, spender), approved - amount);
        state.tokens.insert(from, from_after);
        state.tokens.insert(to, to_after);
        Ok(())
    }

    fn transfer_native(
        &self,
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.ensure_accepts(to)?;

        let from_after = Balances::debit(&state.native, from, amount)?;
        if from == to {
            return Ok(());
        }
        let to_after = Balances::credit(&state.native, to, amount)?;

        state.native.insert(from, from_after);
        state.native.insert(to, to_after);
        Ok(())
    }

    fn reverse(&self, transfer: &Transfer) -> Result<(), GatewayError> {
        let mut state = self.state();
        match *transfer {
            Transfer::Token {
                spender,
                from,
                to,
                amount,
            } => {
                let approved = state.allowances.get(&(from, spender)).copied().unwrap_or(0);
                let restored = approved.checked_add(amount).ok_or_else(|| {
                    GatewayError::Rejected(format!("allowance of {from} would overflow"))
                })?;
                if from != to {
                    let to_after = Balances::debit(&state.tokens, to, amount)?;
                    let from_after = Balances::credit(&state.tokens, from, amount)?;
                    state.tokens.insert(to, to_after);
                    state.tokens.insert(from, from_after);
                }
                state.allowances.insert((from, spender), restored);
            }
            Transfer::Native { from, to, amount } => {
                if from != to {
                    let to_after = Balances::debit(&state.native, to, amount)?;
                    let from_after = Balances::credit(&state.native, from, amount)?;
                    state.native.insert(to, to_after);
                    state.native.insert(from, from_after);
                }
            }
        }
        Ok(())
    }
}
