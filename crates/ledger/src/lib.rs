//! Debt ledger and settlement engine (per-group aggregate).
//!
//! Pure domain logic only: no IO, no locking, no value movement.

pub mod debt;
pub mod expense;
pub mod group;
pub mod ledger;
pub mod netting;
pub mod settlement;

pub use debt::{DebtEdge, DebtGraph, DebtLedger, Net, NetPosition};
pub use expense::{Expense, ExpenseSplit, split_expense};
pub use group::{Group, MIN_MEMBERS};
pub use ledger::{
    AddExpense, CreateGroup, DebtSettled, DebtsSimplified, ExpenseAdded, GroupCommand,
    GroupCreated, GroupLedger, JoinGroup, LedgerEvent, MemberJoined, SettleDebt, SimplifyDebts,
};
pub use netting::{NettedPair, plan_netting};
pub use settlement::{
    NativeSettlement, OverpaymentPolicy, SettlementMethod, UnknownPolicy, plan_native_settlement,
};
