/// Decide and evolve in one step: `handle` the command, then `apply` every
/// resulting event to the aggregate.
///
/// If `handle` fails the aggregate is untouched. Use this for commands with no
/// external side effect; settlement splits the two steps around its transfer.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: splitledger_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
