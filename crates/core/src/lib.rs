//! Foundation types shared by every layer of the split ledger.
//!
//! Identifiers, the amount type, the domain error taxonomy and the aggregate
//! traits. No IO, no infrastructure concerns.

pub mod aggregate;
pub mod amount;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use amount::Amount;
pub use error::{ErrorClass, LedgerError, LedgerResult};
pub use id::{ExpenseId, GroupId, IdParseError, PrincipalId};
