use splitledger_core::{GroupId, PrincipalId};

/// A command targets exactly one group and is issued by an explicit principal.
///
/// Commands are intent ("add this expense"); events are the accepted facts.
/// No operation spans two groups, so routing by [`Command::target_group`] is
/// enough to pick the lock that serializes it.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_group(&self) -> GroupId;

    /// The acting principal. Never inferred from ambient context.
    fn caller(&self) -> PrincipalId;
}
