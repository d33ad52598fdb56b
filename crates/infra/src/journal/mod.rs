//! Append-only per-group event journal.
//!
//! Every committed event is recorded here, in order, before it is applied to
//! the live aggregate and before it is published. Replaying a group's journal
//! rebuilds that group's state.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryJournal;
pub use r#trait::{Journal, JournalError, JournalRecord};
