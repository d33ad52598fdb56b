//! Aggregate root traits for the per-group consistency boundary.

/// Aggregate root marker + minimal interface.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Number of events applied so far.
    ///
    /// Doubles as the sequence number of the last event in the aggregate's
    /// journal stream.
    fn version(&self) -> u64;
}

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` validates the command against the
///   current state and returns the events it produces. All checks that could
///   fail (membership, amounts, overflow, underflow) happen here.
/// - **State mutation**: `apply(&mut self, event)` evolves state and must not fail
///   for an event that `handle` produced against the same state.
///
/// Aggregates perform no IO. Anything with an external effect (value transfer,
/// notification) is orchestrated by the caller between `handle` and `apply`.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event (+1 version).
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}
