use chrono::{DateTime, Utc};

use splitledger_core::GroupId;

/// A ledger event: an immutable fact about one group.
///
/// Events are append-only and versioned. Each belongs to exactly one group,
/// which is the unit of serialization and of journal streams.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "ledger.expense.added").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// The group this event belongs to.
    fn group_id(&self) -> GroupId;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}
