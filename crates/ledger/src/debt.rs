//! Pairwise debt storage for one group.
//!
//! Edges are raw and directional: `debt[a][b]` and `debt[b][a]` can both be
//! nonzero until netting runs. Absent edges read as zero and an edge that
//! drops to zero is removed, so iteration only ever sees nonzero debt.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use splitledger_core::{Amount, LedgerError, LedgerResult, PrincipalId};

/// One directed edge: `debtor` owes `creditor` `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEdge {
    pub debtor: PrincipalId,
    pub creditor: PrincipalId,
    pub amount: Amount,
}

/// Every nonzero edge of a group as three parallel sequences.
///
/// Ordered by `(debtor, creditor)`, so two reads of the same state always agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtGraph {
    pub debtors: Vec<PrincipalId>,
    pub creditors: Vec<PrincipalId>,
    pub amounts: Vec<Amount>,
}

impl DebtGraph {
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Re-zip the parallel sequences into edges.
    pub fn edges(&self) -> impl Iterator<Item = DebtEdge> + '_ {
        self.debtors
            .iter()
            .zip(&self.creditors)
            .zip(&self.amounts)
            .map(|((d, c), a)| DebtEdge {
                debtor: *d,
                creditor: *c,
                amount: *a,
            })
    }
}

impl FromIterator<DebtEdge> for DebtGraph {
    fn from_iter<I: IntoIterator<Item = DebtEdge>>(iter: I) -> Self {
        let mut graph = DebtGraph::default();
        for edge in iter {
            graph.debtors.push(edge.debtor);
            graph.creditors.push(edge.creditor);
            graph.amounts.push(edge.amount);
        }
        graph
    }
}

/// Signed relation between two principals, read from both edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Net {
    /// The first principal owes the second this much more than the reverse.
    Owes(Amount),
    /// The second principal owes the first this much more than the reverse.
    Owed(Amount),
    Even,
}

/// Aggregated position of one member across all of its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPosition {
    pub member: PrincipalId,
    /// Sum of edges where the member is the creditor.
    pub owed_to_member: Amount,
    /// Sum of edges where the member is the debtor.
    pub owed_by_member: Amount,
}

impl NetPosition {
    pub fn net(&self) -> Net {
        match self.owed_to_member.cmp(&self.owed_by_member) {
            core::cmp::Ordering::Greater => Net::Owed(self.owed_to_member - self.owed_by_member),
            core::cmp::Ordering::Less => Net::Owes(self.owed_by_member - self.owed_to_member),
            core::cmp::Ordering::Equal => Net::Even,
        }
    }
}

/// Authoritative `(debtor, creditor) -> amount` store for a single group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebtLedger {
    edges: BTreeMap<(PrincipalId, PrincipalId), Amount>,
}

impl DebtLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored amount, no netting. Zero when absent.
    pub fn get(&self, debtor: PrincipalId, creditor: PrincipalId) -> Amount {
        self.edges.get(&(debtor, creditor)).copied().unwrap_or(0)
    }

    /// What `increase` would store, without storing it.
    pub fn checked_increase(
        &self,
        debtor: PrincipalId,
        creditor: PrincipalId,
        delta: Amount,
    ) -> LedgerResult<Amount> {
        self.get(debtor, creditor)
            .checked_add(delta)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// What `decrease` would store, without storing it.
    pub fn checked_decrease(
        &self,
        debtor: PrincipalId,
        creditor: PrincipalId,
        delta: Amount,
    ) -> LedgerResult<Amount> {
        let owed = self.get(debtor, creditor);
        owed.checked_sub(delta).ok_or(LedgerError::InsufficientDebt {
            requested: delta,
            owed,
        })
    }

    /// `debt[debtor][creditor] += delta`, returning the new amount.
    pub fn increase(
        &mut self,
        debtor: PrincipalId,
        creditor: PrincipalId,
        delta: Amount,
    ) -> LedgerResult<Amount> {
        let next = self.checked_increase(debtor, creditor, delta)?;
        self.store(debtor, creditor, next);
        Ok(next)
    }

    /// `debt[debtor][creditor] -= delta`, returning the new amount.
    ///
    /// Never clamps: a delta larger than the stored amount is `InsufficientDebt`.
    pub fn decrease(
        &mut self,
        debtor: PrincipalId,
        creditor: PrincipalId,
        delta: Amount,
    ) -> LedgerResult<Amount> {
        let next = self.checked_decrease(debtor, creditor, delta)?;
        self.store(debtor, creditor, next);
        Ok(next)
    }

    fn store(&mut self, debtor: PrincipalId, creditor: PrincipalId, amount: Amount) {
        if amount == 0 {
            self.edges.remove(&(debtor, creditor));
        } else {
            self.edges.insert((debtor, creditor), amount);
        }
    }

    /// `a`'s net relation to `b` across both directed edges.
    pub fn net(&self, a: PrincipalId, b: PrincipalId) -> Net {
        let forward = self.get(a, b);
        let backward = self.get(b, a);
        match forward.cmp(&backward) {
            core::cmp::Ordering::Greater => Net::Owes(forward - backward),
            core::cmp::Ordering::Less => Net::Owed(backward - forward),
            core::cmp::Ordering::Equal => Net::Even,
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = DebtEdge> + '_ {
        self.edges.iter().map(|((debtor, creditor), amount)| DebtEdge {
            debtor: *debtor,
            creditor: *creditor,
            amount: *amount,
        })
    }

    pub fn graph(&self) -> DebtGraph {
        self.edges().collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Per-member totals, in the order of `members`.
    pub fn positions(&self, members: &[PrincipalId]) -> LedgerResult<Vec<NetPosition>> {
        let mut positions: Vec<NetPosition> = members
            .iter()
            .map(|m| NetPosition {
                member: *m,
                owed_to_member: 0,
                owed_by_member: 0,
            })
            .collect();

        for edge in self.edges() {
            for pos in positions.iter_mut() {
                if pos.member == edge.creditor {
                    pos.owed_to_member = pos
                        .owed_to_member
                        .checked_add(edge.amount)
                        .ok_or(LedgerError::ArithmeticOverflow)?;
                } else if pos.member == edge.debtor {
                    pos.owed_by_member = pos
                        .owed_by_member
                        .checked_add(edge.amount)
                        .ok_or(LedgerError::ArithmeticOverflow)?;
                }
            }
        }

        Ok(positions)
    }
}
