//! The ledger service: every group operation, serialized per group.
//!
//! Each mutating call runs this pipeline while holding the group's lock:
//!
//! ```text
//! command
//!   ↓ decide   (GroupLedger::handle, all validation, no mutation)
//!   ↓ transfer (settlement only, via ValueTransferGateway)
//!   ↓ journal  (append with the aggregate version as expected version)
//!   ↓ apply    (GroupLedger::apply)
//!   ↓ publish  (EventBus, failures logged only)
//! ```
//!
//! Any failure before `apply` leaves the group exactly as it was. When the
//! journal refuses a settlement whose transfer already went through, the
//! transfer is reversed before the error is returned.

use std::sync::{MutexGuard, PoisonError};

use chrono::Utc;
use thiserror::Error;

use splitledger_core::{Aggregate, AggregateRoot, Amount, GroupId, LedgerError, PrincipalId};
use splitledger_events::{Command, EventBus};
use splitledger_ledger::{
    AddExpense, CreateGroup, DebtGraph, Expense, ExpenseAdded, Group, GroupCommand, GroupLedger,
    JoinGroup, LedgerEvent, NativeSettlement, NetPosition, NettedPair, SettleDebt,
    SettlementMethod, SimplifyDebts, plan_native_settlement,
};

use crate::config::EngineConfig;
use crate::gateway::{Transfer, ValueTransferGateway};
use crate::journal::{InMemoryJournal, Journal, JournalError, JournalRecord};
use crate::registry::{GroupHandle, GroupRegistry};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A writer panicked while holding the group's lock.
    #[error("group {0} is unavailable after a failed writer")]
    Poisoned(GroupId),

    #[error(transparent)]
    Journal(#[from] JournalError),
}

impl EngineError {
    /// Stable snake_case code.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Ledger(e) => e.kind(),
            EngineError::Poisoned(_) => "group_poisoned",
            EngineError::Journal(_) => "journal_failure",
        }
    }

    pub fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            EngineError::Ledger(e) => Some(e),
            _ => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Shared-expense ledger over a value gateway `G`, a notification bus `B` and
/// an audit journal `J`.
///
/// All methods take `&self`; wrap the engine in an `Arc` to share it.
#[derive(Debug)]
pub struct SplitLedgerEngine<G, B, J = InMemoryJournal> {
    config: EngineConfig,
    registry: GroupRegistry,
    journal: J,
    gateway: G,
    bus: B,
}

impl<G, B> SplitLedgerEngine<G, B, InMemoryJournal> {
    pub fn new(config: EngineConfig, gateway: G, bus: B) -> Self {
        Self::with_journal(config, gateway, bus, InMemoryJournal::new())
    }
}

impl<G, B, J> SplitLedgerEngine<G, B, J> {
    pub fn with_journal(config: EngineConfig, gateway: G, bus: B, journal: J) -> Self {
        Self {
            config,
            registry: GroupRegistry::new(),
            journal,
            gateway,
            bus,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<G, B, J> SplitLedgerEngine<G, B, J>
where
    G: ValueTransferGateway,
    B: EventBus<JournalRecord>,
    J: Journal,
{
    /// Create a group with `caller` as creator and first member.
    pub fn create_group(
        &self,
        caller: PrincipalId,
        name: impl Into<String>,
        initial_members: &[PrincipalId],
    ) -> EngineResult<GroupId> {
        let name = name.into();
        let group_id = self.registry.create(|group_id| {
            let mut ledger = GroupLedger::empty(group_id);
            let command = GroupCommand::CreateGroup(CreateGroup {
                group_id,
                caller,
                name: name.clone(),
                initial_members: initial_members.to_vec(),
                occurred_at: Utc::now(),
            });
            let events = self.decide(&ledger, &command)?;
            self.commit(&mut ledger, events)?;
            Ok::<_, EngineError>(ledger)
        })?;

        tracing::info!(%group_id, creator = %caller, %name, "group created");
        Ok(group_id)
    }

    pub fn join_group(&self, group_id: GroupId, caller: PrincipalId) -> EngineResult<()> {
        self.mutate(group_id, |ledger| {
            let command = GroupCommand::JoinGroup(JoinGroup {
                group_id,
                caller,
                occurred_at: Utc::now(),
            });
            let events = self.decide(ledger, &command)?;
            self.commit(ledger, events)?;
            tracing::info!(%group_id, member = %caller, "member joined");
            Ok(())
        })
    }

    /// Record an expense paid by `caller` and charge each other participant
    /// an equal share.
    pub fn add_expense(
        &self,
        group_id: GroupId,
        caller: PrincipalId,
        description: impl Into<String>,
        amount: Amount,
        participants: &[PrincipalId],
    ) -> EngineResult<Expense> {
        self.mutate(group_id, |ledger| {
            let command = AddExpense {
                group_id,
                caller,
                description: description.into(),
                amount,
                participants: participants.to_vec(),
                occurred_at: Utc::now(),
            };
            let expense = ledger
                .plan_expense(&command)
                .map_err(|err| rejected(group_id, caller, err))?;
            self.commit(
                ledger,
                vec![LedgerEvent::ExpenseAdded(ExpenseAdded {
                    expense: expense.clone(),
                })],
            )?;

            tracing::info!(
                %group_id,
                payer = %caller,
                amount,
                share = expense.share,
                expense_id = %expense.id,
                "expense added"
            );
            Ok(expense)
        })
    }

    /// Net every bidirectional pair. Returns what was cancelled; empty when
    /// there was nothing to net.
    pub fn simplify_debts(
        &self,
        group_id: GroupId,
        caller: PrincipalId,
    ) -> EngineResult<Vec<NettedPair>> {
        self.mutate(group_id, |ledger| {
            let command = GroupCommand::SimplifyDebts(SimplifyDebts {
                group_id,
                caller,
                occurred_at: Utc::now(),
            });
            let events = self.decide(ledger, &command)?;
            let netted = match events.first() {
                Some(LedgerEvent::DebtsSimplified(e)) => e.netted.clone(),
                _ => Vec::new(),
            };
            for pair in &netted {
                tracing::debug!(
                    %group_id,
                    debtor = %pair.debtor,
                    creditor = %pair.creditor,
                    cancelled = pair.cancelled,
                    residual = pair.residual,
                    "pair netted"
                );
            }
            self.commit(ledger, events)?;

            tracing::info!(%group_id, pairs = netted.len(), "debts simplified");
            Ok(netted)
        })
    }

    /// Pay `amount` of `caller`'s debt to `creditor` in ledger tokens.
    ///
    /// Tokens are pulled with `transfer_from`, spending the allowance the
    /// debtor granted to the configured service principal.
    pub fn settle_debt(
        &self,
        group_id: GroupId,
        caller: PrincipalId,
        creditor: PrincipalId,
        amount: Amount,
    ) -> EngineResult<()> {
        self.mutate(group_id, |ledger| {
            let command = settle_command(group_id, caller, creditor, amount, SettlementMethod::Token);
            let events = self.decide(ledger, &command)?;
            let transfer = Transfer::Token {
                spender: self.config.service_principal,
                from: caller,
                to: creditor,
                amount,
            };
            self.settle(ledger, &transfer, events)?;
            tracing::info!(%group_id, debtor = %caller, %creditor, amount, "debt settled");
            Ok(())
        })
    }

    /// Pay with native value `attached`. At most the current debt is applied
    /// and forwarded; the rest is refunded or rejected per
    /// [`EngineConfig::overpayment`].
    pub fn settle_debt_native(
        &self,
        group_id: GroupId,
        caller: PrincipalId,
        creditor: PrincipalId,
        attached: Amount,
    ) -> EngineResult<NativeSettlement> {
        self.mutate(group_id, |ledger| {
            if !ledger.is_member(caller) {
                return Err(rejected(group_id, caller, LedgerError::not_member(group_id, caller)));
            }

            let owed = ledger.debt(caller, creditor);
            let plan = plan_native_settlement(attached, owed, self.config.overpayment)
                .map_err(|err| rejected(group_id, caller, err))?;

            if plan.applied == 0 {
                tracing::info!(%group_id, debtor = %caller, %creditor, refunded = plan.refunded, "nothing owed; payment refunded");
                return Ok(plan);
            }

            let command = settle_command(
                group_id,
                caller,
                creditor,
                plan.applied,
                SettlementMethod::Native,
            );
            let events = self.decide(ledger, &command)?;
            let transfer = Transfer::Native {
                from: caller,
                to: creditor,
                amount: plan.applied,
            };
            self.settle(ledger, &transfer, events)?;
            tracing::info!(
                %group_id,
                debtor = %caller,
                %creditor,
                applied = plan.applied,
                refunded = plan.refunded,
                "debt settled natively"
            );
            Ok(plan)
        })
    }

    /// Raw stored amount; 0 for unknown groups or absent edges.
    pub fn get_debt(&self, group_id: GroupId, debtor: PrincipalId, creditor: PrincipalId) -> Amount {
        self.read(group_id, |ledger| ledger.debt(debtor, creditor))
            .unwrap_or(0)
    }

    /// Nonzero edges sorted by `(debtor, creditor)`; empty for unknown groups.
    pub fn debt_graph(&self, group_id: GroupId) -> DebtGraph {
        self.read(group_id, GroupLedger::graph).unwrap_or_default()
    }

    pub fn is_member(&self, group_id: GroupId, principal: PrincipalId) -> bool {
        self.read(group_id, |ledger| ledger.is_member(principal))
            .unwrap_or(false)
    }

    /// Groups created so far; the next group gets this id.
    pub fn group_count(&self) -> u64 {
        self.registry.count()
    }

    pub fn group(&self, group_id: GroupId) -> EngineResult<Group> {
        self.read_known(group_id, |ledger| ledger.group().cloned())?
            .ok_or_else(|| LedgerError::UnknownGroup(group_id).into())
    }

    pub fn group_name(&self, group_id: GroupId) -> EngineResult<String> {
        self.group(group_id).map(|g| g.name)
    }

    pub fn members(&self, group_id: GroupId) -> EngineResult<Vec<PrincipalId>> {
        self.read_known(group_id, |ledger| ledger.members().to_vec())
    }

    pub fn expenses(&self, group_id: GroupId) -> EngineResult<Vec<Expense>> {
        self.read_known(group_id, |ledger| ledger.expenses().to_vec())
    }

    pub fn positions(&self, group_id: GroupId) -> EngineResult<Vec<NetPosition>> {
        Ok(self.read_known(group_id, GroupLedger::positions)??)
    }

    /// Journaled events for a group, oldest first.
    pub fn history(&self, group_id: GroupId) -> EngineResult<Vec<JournalRecord>> {
        if self.registry.get(group_id).is_none() {
            return Err(LedgerError::UnknownGroup(group_id).into());
        }
        Ok(self.journal.load(group_id)?)
    }

    fn decide(
        &self,
        ledger: &GroupLedger,
        command: &GroupCommand,
    ) -> EngineResult<Vec<LedgerEvent>> {
        ledger
            .handle(command)
            .map_err(|err| rejected(*ledger.id(), command.caller(), err))
    }

    /// Move the value, then commit. A journal failure after the transfer
    /// reverses it so neither side of the settlement survives alone.
    fn settle(
        &self,
        ledger: &mut GroupLedger,
        transfer: &Transfer,
        events: Vec<LedgerEvent>,
    ) -> EngineResult<()> {
        let group_id = *ledger.id();
        self.gateway.execute(transfer).map_err(|err| {
            tracing::warn!(%group_id, ?transfer, error = %err, "transfer failed");
            LedgerError::transfer_failed(err.to_string())
        })?;

        if let Err(err) = self.commit(ledger, events) {
            match self.gateway.reverse(transfer) {
                Ok(()) => {
                    tracing::warn!(%group_id, ?transfer, error = %err, "settlement not journaled; transfer reversed")
                }
                Err(undo) => {
                    tracing::error!(%group_id, ?transfer, error = %err, reversal = %undo, "settlement not journaled and transfer could not be reversed")
                }
            }
            return Err(err);
        }
        Ok(())
    }

    /// Journal, apply, then publish. Nothing is applied if the journal refuses.
    fn commit(&self, ledger: &mut GroupLedger, events: Vec<LedgerEvent>) -> EngineResult<()> {
        if events.is_empty() {
            return Ok(());
        }

        let records = self
            .journal
            .append(*ledger.id(), ledger.version(), &events)?;
        for event in &events {
            ledger.apply(event);
        }

        for record in records {
            let event_type = record.event_type().to_string();
            if let Err(err) = self.bus.publish(record) {
                tracing::warn!(group_id = %ledger.id(), %event_type, error = ?err, "notification not delivered");
            }
        }
        Ok(())
    }

    /// Run `op` with the group's lock held.
    fn mutate<T>(
        &self,
        group_id: GroupId,
        op: impl FnOnce(&mut GroupLedger) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let handle: GroupHandle = self.registry.get(group_id).ok_or_else(|| {
            tracing::warn!(%group_id, "command for unknown group");
            LedgerError::UnknownGroup(group_id)
        })?;
        let mut ledger = handle
            .lock()
            .map_err(|_| EngineError::Poisoned(group_id))?;
        op(&mut *ledger)
    }

    fn read<T>(&self, group_id: GroupId, op: impl FnOnce(&GroupLedger) -> T) -> Option<T> {
        let handle = self.registry.get(group_id)?;
        let ledger: MutexGuard<'_, GroupLedger> =
            handle.lock().unwrap_or_else(PoisonError::into_inner);
        Some(op(&*ledger))
    }

    fn read_known<T>(&self, group_id: GroupId, op: impl FnOnce(&GroupLedger) -> T) -> EngineResult<T> {
        self.read(group_id, op)
            .ok_or_else(|| LedgerError::UnknownGroup(group_id).into())
    }
}

fn rejected(group_id: GroupId, caller: PrincipalId, err: LedgerError) -> EngineError {
    tracing::warn!(%group_id, %caller, kind = err.kind(), error = %err, "command rejected");
    EngineError::Ledger(err)
}

fn settle_command(
    group_id: GroupId,
    caller: PrincipalId,
    creditor: PrincipalId,
    amount: Amount,
    method: SettlementMethod,
) -> GroupCommand {
    GroupCommand::SettleDebt(SettleDebt {
        group_id,
        caller,
        creditor,
        amount,
        method,
        occurred_at: Utc::now(),
    })
}
