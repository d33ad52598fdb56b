use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{
    Aggregate, AggregateRoot, Amount, ExpenseId, GroupId, LedgerError, LedgerResult, PrincipalId,
};
use splitledger_events::{Command, Event};

use crate::debt::{DebtGraph, DebtLedger, NetPosition};
use crate::expense::{Expense, split_expense};
use crate::group::Group;
use crate::netting::{NettedPair, apply_netting, plan_netting};
use crate::settlement::{SettlementMethod, check_token_settlement};

/// Aggregate root: one group with its members, expense log and debt edges.
///
/// Every mutation of a group goes through `handle` + `apply`, so a group is
/// also the serialization unit: callers hold one lock per `GroupLedger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLedger {
    id: GroupId,
    group: Option<Group>,
    debts: DebtLedger,
    expenses: Vec<Expense>,
    version: u64,
}

impl GroupLedger {
    /// Not-yet-created aggregate, the starting point for creation and replay.
    pub fn empty(id: GroupId) -> Self {
        Self {
            id,
            group: None,
            debts: DebtLedger::new(),
            expenses: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild state from a recorded event history.
    pub fn replay<'a>(id: GroupId, history: impl IntoIterator<Item = &'a LedgerEvent>) -> Self {
        let mut ledger = Self::empty(id);
        for event in history {
            ledger.apply(event);
        }
        ledger
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn debts(&self) -> &DebtLedger {
        &self.debts
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn is_member(&self, principal: PrincipalId) -> bool {
        self.group.as_ref().is_some_and(|g| g.is_member(principal))
    }

    pub fn members(&self) -> &[PrincipalId] {
        self.group.as_ref().map(Group::members).unwrap_or(&[])
    }

    pub fn debt(&self, debtor: PrincipalId, creditor: PrincipalId) -> Amount {
        self.debts.get(debtor, creditor)
    }

    pub fn graph(&self) -> DebtGraph {
        self.debts.graph()
    }

    pub fn positions(&self) -> LedgerResult<Vec<NetPosition>> {
        self.debts.positions(self.members())
    }

    fn created(&self) -> LedgerResult<&Group> {
        self.group.as_ref().ok_or(LedgerError::UnknownGroup(self.id))
    }

    /// Created group where `caller` is a member.
    fn member_scope(&self, caller: PrincipalId) -> LedgerResult<&Group> {
        let group = self.created()?;
        group.ensure_member(caller)?;
        Ok(group)
    }
}

impl AggregateRoot for GroupLedger {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateGroup. The caller becomes the creator and first member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroup {
    pub group_id: GroupId,
    pub caller: PrincipalId,
    pub name: String,
    pub initial_members: Vec<PrincipalId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: JoinGroup. Adds the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinGroup {
    pub group_id: GroupId,
    pub caller: PrincipalId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddExpense. The caller is the payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddExpense {
    pub group_id: GroupId,
    pub caller: PrincipalId,
    pub description: String,
    pub amount: Amount,
    pub participants: Vec<PrincipalId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SimplifyDebts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyDebts {
    pub group_id: GroupId,
    pub caller: PrincipalId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SettleDebt. The caller is the debtor; `amount` is what the
/// transfer moves (for native payments, the already-capped applied amount).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleDebt {
    pub group_id: GroupId,
    pub caller: PrincipalId,
    pub creditor: PrincipalId,
    pub amount: Amount,
    pub method: SettlementMethod,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupCommand {
    CreateGroup(CreateGroup),
    JoinGroup(JoinGroup),
    AddExpense(AddExpense),
    SimplifyDebts(SimplifyDebts),
    SettleDebt(SettleDebt),
}

impl Command for GroupCommand {
    fn target_group(&self) -> GroupId {
        match self {
            GroupCommand::CreateGroup(c) => c.group_id,
            GroupCommand::JoinGroup(c) => c.group_id,
            GroupCommand::AddExpense(c) => c.group_id,
            GroupCommand::SimplifyDebts(c) => c.group_id,
            GroupCommand::SettleDebt(c) => c.group_id,
        }
    }

    fn caller(&self) -> PrincipalId {
        match self {
            GroupCommand::CreateGroup(c) => c.caller,
            GroupCommand::JoinGroup(c) => c.caller,
            GroupCommand::AddExpense(c) => c.caller,
            GroupCommand::SimplifyDebts(c) => c.caller,
            GroupCommand::SettleDebt(c) => c.caller,
        }
    }
}

/// Event: GroupCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCreated {
    pub group_id: GroupId,
    pub name: String,
    pub creator: PrincipalId,
    pub members: Vec<PrincipalId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MemberJoined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberJoined {
    pub group_id: GroupId,
    pub member: PrincipalId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpenseAdded. Carries the full audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseAdded {
    pub expense: Expense,
}

/// Event: DebtsSimplified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtsSimplified {
    pub group_id: GroupId,
    pub netted: Vec<NettedPair>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DebtSettled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSettled {
    pub group_id: GroupId,
    pub debtor: PrincipalId,
    pub creditor: PrincipalId,
    pub amount: Amount,
    pub method: SettlementMethod,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    GroupCreated(GroupCreated),
    MemberJoined(MemberJoined),
    ExpenseAdded(ExpenseAdded),
    DebtsSimplified(DebtsSimplified),
    DebtSettled(DebtSettled),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::GroupCreated(_) => "ledger.group.created",
            LedgerEvent::MemberJoined(_) => "ledger.group.member_joined",
            LedgerEvent::ExpenseAdded(_) => "ledger.expense.added",
            LedgerEvent::DebtsSimplified(_) => "ledger.debts.simplified",
            LedgerEvent::DebtSettled(_) => "ledger.debt.settled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn group_id(&self) -> GroupId {
        match self {
            LedgerEvent::GroupCreated(e) => e.group_id,
            LedgerEvent::MemberJoined(e) => e.group_id,
            LedgerEvent::ExpenseAdded(e) => e.expense.group_id,
            LedgerEvent::DebtsSimplified(e) => e.group_id,
            LedgerEvent::DebtSettled(e) => e.group_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::GroupCreated(e) => e.occurred_at,
            LedgerEvent::MemberJoined(e) => e.occurred_at,
            LedgerEvent::ExpenseAdded(e) => e.expense.recorded_at,
            LedgerEvent::DebtsSimplified(e) => e.occurred_at,
            LedgerEvent::DebtSettled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for GroupLedger {
    type Command = GroupCommand;
    type Event = LedgerEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::GroupCreated(e) => {
                self.id = e.group_id;
                self.group = Some(Group::restore(
                    e.group_id,
                    e.name.clone(),
                    e.creator,
                    e.members.clone(),
                    e.occurred_at,
                ));
            }
            LedgerEvent::MemberJoined(e) => {
                if let Some(group) = self.group.as_mut() {
                    group.admit(e.member);
                }
            }
            LedgerEvent::ExpenseAdded(e) => {
                let expense = &e.expense;
                for debtor in expense.debtors() {
                    if let Err(err) = self.debts.increase(debtor, expense.payer, expense.share) {
                        tracing::error!(group_id = %self.id, %debtor, error = %err, "expense delta not applied");
                    }
                }
                self.expenses.push(expense.clone());
            }
            LedgerEvent::DebtsSimplified(e) => {
                if let Err(err) = apply_netting(&mut self.debts, &e.netted) {
                    tracing::error!(group_id = %self.id, error = %err, "netting plan not applied");
                }
            }
            LedgerEvent::DebtSettled(e) => {
                if let Err(err) = self.debts.decrease(e.debtor, e.creditor, e.amount) {
                    tracing::error!(group_id = %self.id, debtor = %e.debtor, error = %err, "settlement not applied");
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            GroupCommand::CreateGroup(cmd) => self.handle_create(cmd),
            GroupCommand::JoinGroup(cmd) => self.handle_join(cmd),
            GroupCommand::AddExpense(cmd) => self.handle_add_expense(cmd),
            GroupCommand::SimplifyDebts(cmd) => self.handle_simplify(cmd),
            GroupCommand::SettleDebt(cmd) => self.handle_settle(cmd),
        }
    }
}

impl GroupLedger {
    fn handle_create(&self, cmd: &CreateGroup) -> LedgerResult<Vec<LedgerEvent>> {
        if self.group.is_some() {
            return Err(LedgerError::GroupExists(self.id));
        }

        let group = Group::found(
            cmd.group_id,
            cmd.name.clone(),
            cmd.caller,
            &cmd.initial_members,
            cmd.occurred_at,
        )?;

        Ok(vec![LedgerEvent::GroupCreated(GroupCreated {
            group_id: group.id,
            members: group.members().to_vec(),
            name: group.name,
            creator: group.creator,
            occurred_at: group.created_at,
        })])
    }

    fn handle_join(&self, cmd: &JoinGroup) -> LedgerResult<Vec<LedgerEvent>> {
        self.created()?.ensure_can_join(cmd.caller)?;

        Ok(vec![LedgerEvent::MemberJoined(MemberJoined {
            group_id: self.id,
            member: cmd.caller,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_expense(&self, cmd: &AddExpense) -> LedgerResult<Vec<LedgerEvent>> {
        let expense = self.plan_expense(cmd)?;
        Ok(vec![LedgerEvent::ExpenseAdded(ExpenseAdded { expense })])
    }

    /// Validate an expense against current state and build its record,
    /// without recording it.
    pub fn plan_expense(&self, cmd: &AddExpense) -> LedgerResult<Expense> {
        let group = self.member_scope(cmd.caller)?;
        let split = split_expense(cmd.amount, &cmd.participants)?;

        for p in &split.participants {
            if !group.is_member(*p) {
                return Err(LedgerError::ParticipantNotMember {
                    group_id: self.id,
                    principal: *p,
                });
            }
        }

        // Distinct debtors, so each edge sees at most one delta.
        for debtor in split.participants.iter().filter(|p| **p != cmd.caller) {
            self.debts.checked_increase(*debtor, cmd.caller, split.share)?;
        }

        let expense = Expense {
            id: ExpenseId::new(self.expenses.len() as u64),
            group_id: self.id,
            description: cmd.description.clone(),
            payer: cmd.caller,
            amount: cmd.amount,
            participants: split.participants,
            share: split.share,
            remainder: split.remainder,
            recorded_at: cmd.occurred_at,
        };

        Ok(expense)
    }

    fn handle_simplify(&self, cmd: &SimplifyDebts) -> LedgerResult<Vec<LedgerEvent>> {
        self.member_scope(cmd.caller)?;

        let netted = plan_netting(&self.debts);
        if netted.is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![LedgerEvent::DebtsSimplified(DebtsSimplified {
            group_id: self.id,
            netted,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_settle(&self, cmd: &SettleDebt) -> LedgerResult<Vec<LedgerEvent>> {
        self.member_scope(cmd.caller)?;
        check_token_settlement(cmd.amount, self.debts.get(cmd.caller, cmd.creditor))?;

        Ok(vec![LedgerEvent::DebtSettled(DebtSettled {
            group_id: self.id,
            debtor: cmd.caller,
            creditor: cmd.creditor,
            amount: cmd.amount,
            method: cmd.method,
            occurred_at: cmd.occurred_at,
        })])
    }
}
