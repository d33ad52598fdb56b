//! Pairwise netting of bidirectional debt.
//!
//! For every pair with debt in both directions the smaller edge is cancelled
//! against the larger one, leaving at most one directed edge per pair. Each
//! pair's net position is preserved because both directions drop by the same
//! amount. Pairs linked only through intermediaries are left alone: there is
//! no multi-party cycle cancellation.

use serde::{Deserialize, Serialize};

use splitledger_core::{Amount, LedgerResult, PrincipalId};

use crate::debt::DebtLedger;

/// One pair collapsed by netting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NettedPair {
    /// Side left owing after netting (the lower id when the pair evens out).
    pub debtor: PrincipalId,
    pub creditor: PrincipalId,
    /// Subtracted from both directed edges.
    pub cancelled: Amount,
    /// `debt[debtor][creditor]` after netting.
    pub residual: Amount,
}

/// Every pair that currently carries debt in both directions.
///
/// Walks existing edges only, visiting each unordered pair once, in the
/// ledger's `(debtor, creditor)` order. Empty when nothing needs netting.
pub fn plan_netting(debts: &DebtLedger) -> Vec<NettedPair> {
    debts
        .edges()
        .filter(|edge| edge.debtor < edge.creditor)
        .filter_map(|edge| {
            let forward = edge.amount;
            let backward = debts.get(edge.creditor, edge.debtor);
            if backward == 0 {
                return None;
            }

            let cancelled = forward.min(backward);
            let (debtor, creditor) = if forward >= backward {
                (edge.debtor, edge.creditor)
            } else {
                (edge.creditor, edge.debtor)
            };

            Some(NettedPair {
                debtor,
                creditor,
                cancelled,
                residual: forward.max(backward) - cancelled,
            })
        })
        .collect()
}

/// Apply a netting plan produced against the same ledger state.
pub fn apply_netting(debts: &mut DebtLedger, plan: &[NettedPair]) -> LedgerResult<()> {
    for pair in plan {
        debts.decrease(pair.debtor, pair.creditor, pair.cancelled)?;
        debts.decrease(pair.creditor, pair.debtor, pair.cancelled)?;
    }
    Ok(())
}

/// Plan and apply in one step; returns the pairs that were netted.
pub fn simplify(debts: &mut DebtLedger) -> LedgerResult<Vec<NettedPair>> {
    let plan = plan_netting(debts);
    apply_netting(debts, &plan)?;
    Ok(plan)
}
