//! End-to-end tests for the engine pipeline.
//!
//! Tests: command → GroupLedger → gateway → journal → apply → EventBus
//!
//! Verifies:
//! - Expense, netting and settlement scenarios against live state
//! - Failed settlements leave no trace (ledger, journal, notifications)
//! - A journal failure after a settlement transfer reverses the transfer
//! - Per-group serialization under concurrent writers
//! - Journal replay rebuilds the live state

#[cfg(test)]
mod tests {
    use std::sync::{Arc, mpsc};
    use std::thread;

    use uuid::Uuid;

    use splitledger_core::{Amount, GroupId, LedgerError, PrincipalId};
    use splitledger_events::{EventBus, InMemoryEventBus, Subscription};
    use splitledger_ledger::{GroupLedger, LedgerEvent, NativeSettlement, OverpaymentPolicy};

    use crate::config::EngineConfig;
    use crate::engine::{EngineError, SplitLedgerEngine};
    use crate::gateway::InMemoryValueGateway;
    use crate::journal::{InMemoryJournal, Journal, JournalError, JournalRecord};

    type Engine = SplitLedgerEngine<Arc<InMemoryValueGateway>, Arc<InMemoryEventBus<JournalRecord>>>;

    const ETHER: Amount = 1_000_000_000_000_000_000;

    struct Harness {
        engine: Engine,
        gateway: Arc<InMemoryValueGateway>,
        bus: Arc<InMemoryEventBus<JournalRecord>>,
        service: PrincipalId,
    }

    fn harness_with(overpayment: OverpaymentPolicy) -> Harness {
        let service = PrincipalId::new();
        let gateway = Arc::new(InMemoryValueGateway::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let config = EngineConfig {
            service_principal: service,
            overpayment,
        };
        Harness {
            engine: SplitLedgerEngine::new(config, gateway.clone(), bus.clone()),
            gateway,
            bus,
            service,
        }
    }

    fn harness() -> Harness {
        harness_with(OverpaymentPolicy::Refund)
    }

    /// Fixed, ordered principals so graph order is predictable.
    fn principals() -> (PrincipalId, PrincipalId, PrincipalId) {
        (
            PrincipalId::from_uuid(Uuid::from_u128(1)),
            PrincipalId::from_uuid(Uuid::from_u128(2)),
            PrincipalId::from_uuid(Uuid::from_u128(3)),
        )
    }

    fn event_types(sub: &Subscription<JournalRecord>) -> Vec<String> {
        sub.drain()
            .into_iter()
            .map(|r| r.event_type().to_string())
            .collect()
    }

    fn ledger_error(err: EngineError) -> LedgerError {
        match err {
            EngineError::Ledger(e) => e,
            other => panic!("expected ledger error, got {other:?}"),
        }
    }

    #[test]
    fn equal_three_way_split() {
        let h = harness();
        let sub = h.bus.subscribe();
        let (a, b, c) = principals();

        let g = h.engine.create_group(a, "Trip", &[b, c]).unwrap();
        let expense = h.engine.add_expense(g, a, "Dinner", 90, &[a, b, c]).unwrap();

        assert_eq!(expense.share, 30);
        assert_eq!(h.engine.get_debt(g, b, a), 30);
        assert_eq!(h.engine.get_debt(g, c, a), 30);
        assert_eq!(h.engine.get_debt(g, a, b), 0);
        assert_eq!(
            event_types(&sub),
            vec!["ledger.group.created", "ledger.expense.added"]
        );
    }

    #[test]
    fn bidirectional_debt_then_simplify() {
        let h = harness();
        let (a, b, c) = principals();
        let g = h.engine.create_group(a, "Flat", &[b, c]).unwrap();

        h.engine.add_expense(g, a, "Groceries", 60, &[a, b]).unwrap();
        h.engine.add_expense(g, b, "Utilities", 60, &[a, b]).unwrap();
        assert_eq!(h.engine.get_debt(g, b, a), 30);
        assert_eq!(h.engine.get_debt(g, a, b), 30);

        let netted = h.engine.simplify_debts(g, c).unwrap();
        assert_eq!(netted.len(), 1);
        assert_eq!(netted[0].cancelled, 30);
        assert_eq!(h.engine.get_debt(g, b, a), 0);
        assert_eq!(h.engine.get_debt(g, a, b), 0);

        // Nothing left to net.
        assert!(h.engine.simplify_debts(g, c).unwrap().is_empty());
    }

    #[test]
    fn simplify_keeps_net_positions() {
        let h = harness();
        let (a, b, c) = principals();
        let g = h.engine.create_group(a, "Trip", &[b, c]).unwrap();

        h.engine.add_expense(g, a, "Hotel", 300, &[a, b, c]).unwrap();
        h.engine.add_expense(g, b, "Fuel", 90, &[a, b, c]).unwrap();
        h.engine.add_expense(g, c, "Food", 40, &[a, c]).unwrap();

        let net = |x, y| h.engine.get_debt(g, x, y) as i128 - h.engine.get_debt(g, y, x) as i128;
        let before = [net(a, b), net(a, c), net(b, c)];

        h.engine.simplify_debts(g, a).unwrap();

        assert_eq!([net(a, b), net(a, c), net(b, c)], before);
        for (x, y) in [(a, b), (a, c), (b, c)] {
            assert_eq!(h.engine.get_debt(g, x, y).min(h.engine.get_debt(g, y, x)), 0);
        }
    }

    #[test]
    fn partial_native_settlement_in_two_halves() {
        let h = harness();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.engine.add_expense(g, a, "Tickets", 2 * ETHER, &[a, b]).unwrap();
        h.gateway.deposit_native(b, 10 * ETHER).unwrap();
        assert_eq!(h.engine.get_debt(g, b, a), ETHER);

        let first = h.engine.settle_debt_native(g, b, a, ETHER / 2).unwrap();
        assert_eq!(
            first,
            NativeSettlement {
                applied: ETHER / 2,
                refunded: 0
            }
        );
        assert_eq!(h.engine.get_debt(g, b, a), ETHER / 2);

        h.engine.settle_debt_native(g, b, a, ETHER / 2).unwrap();
        assert_eq!(h.engine.get_debt(g, b, a), 0);
        assert_eq!(h.gateway.native_balance_of(a), ETHER);
        assert_eq!(h.gateway.native_balance_of(b), 9 * ETHER);
    }

    #[test]
    fn native_overpayment_is_refunded_by_default() {
        let h = harness();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.engine.add_expense(g, a, "Taxi", 100, &[a, b]).unwrap();
        h.gateway.deposit_native(b, 80).unwrap();

        let outcome = h.engine.settle_debt_native(g, b, a, 80).unwrap();
        assert_eq!(
            outcome,
            NativeSettlement {
                applied: 50,
                refunded: 30
            }
        );
        assert_eq!(h.engine.get_debt(g, b, a), 0);
        assert_eq!(h.gateway.native_balance_of(a), 50);
        assert_eq!(h.gateway.native_balance_of(b), 30);
    }

    #[test]
    fn native_overpayment_can_be_rejected() {
        let h = harness_with(OverpaymentPolicy::Reject);
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.engine.add_expense(g, a, "Taxi", 100, &[a, b]).unwrap();
        h.gateway.deposit_native(b, 80).unwrap();

        let err = h.engine.settle_debt_native(g, b, a, 80).unwrap_err();
        assert_eq!(
            ledger_error(err),
            LedgerError::Overpayment {
                attached: 80,
                owed: 50
            }
        );
        assert_eq!(h.engine.get_debt(g, b, a), 50);
        assert_eq!(h.gateway.native_balance_of(b), 80);
    }

    #[test]
    fn native_payment_with_nothing_owed_moves_nothing() {
        let h = harness();
        let sub = h.bus.subscribe();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.gateway.deposit_native(b, 10).unwrap();
        sub.drain();

        let outcome = h.engine.settle_debt_native(g, b, a, 10).unwrap();
        assert_eq!(
            outcome,
            NativeSettlement {
                applied: 0,
                refunded: 10
            }
        );
        assert_eq!(h.gateway.native_balance_of(b), 10);
        assert!(sub.drain().is_empty());
        assert_eq!(h.engine.history(g).unwrap().len(), 1);
    }

    #[test]
    fn zero_attached_value_is_invalid() {
        let h = harness();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();

        let err = h.engine.settle_debt_native(g, b, a, 0).unwrap_err();
        assert_eq!(ledger_error(err), LedgerError::InvalidAmount);
    }

    #[test]
    fn token_settlement_spends_the_service_allowance() {
        let h = harness();
        let sub = h.bus.subscribe();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.engine.add_expense(g, a, "Dinner", 100, &[a, b]).unwrap();
        h.gateway.mint(b, 100).unwrap();
        h.gateway.approve(b, h.service, 40);
        sub.drain();

        h.engine.settle_debt(g, b, a, 40).unwrap();

        assert_eq!(h.engine.get_debt(g, b, a), 10);
        assert_eq!(h.gateway.balance_of(a), 40);
        assert_eq!(h.gateway.balance_of(b), 60);
        assert_eq!(h.gateway.allowance(b, h.service), 0);
        assert_eq!(event_types(&sub), vec!["ledger.debt.settled"]);
    }

    #[test]
    fn failed_transfer_leaves_no_trace() {
        let h = harness();
        let sub = h.bus.subscribe();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.engine.add_expense(g, a, "Dinner", 100, &[a, b]).unwrap();
        h.gateway.mint(b, 100).unwrap();
        sub.drain();
        let journaled = h.engine.history(g).unwrap().len();

        // No allowance granted.
        let err = h.engine.settle_debt(g, b, a, 50).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::TransferFailed(_)));

        // Allowance granted, but the creditor refuses.
        h.gateway.approve(b, h.service, 50);
        h.gateway.set_refusing(a, true);
        let err = h.engine.settle_debt(g, b, a, 50).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::TransferFailed(_)));

        assert_eq!(h.engine.get_debt(g, b, a), 50);
        assert_eq!(h.gateway.balance_of(b), 100);
        assert_eq!(h.gateway.allowance(b, h.service), 50);
        assert_eq!(h.engine.history(g).unwrap().len(), journaled);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn failed_native_transfer_leaves_no_trace() {
        let h = harness();
        let sub = h.bus.subscribe();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.engine.add_expense(g, a, "Taxi", 100, &[a, b]).unwrap();
        h.gateway.deposit_native(b, 20).unwrap();
        sub.drain();
        let journaled = h.engine.history(g).unwrap().len();

        // Balance too small for the applied part.
        let err = h.engine.settle_debt_native(g, b, a, 40).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::TransferFailed(_)));

        // Enough balance, but the creditor refuses.
        h.gateway.set_refusing(a, true);
        let err = h.engine.settle_debt_native(g, b, a, 20).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::TransferFailed(_)));

        assert_eq!(h.engine.get_debt(g, b, a), 50);
        assert_eq!(h.gateway.native_balance_of(b), 20);
        assert_eq!(h.gateway.native_balance_of(a), 0);
        assert_eq!(h.engine.history(g).unwrap().len(), journaled);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn settlement_beyond_debt_is_rejected_before_transfer() {
        let h = harness();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.engine.add_expense(g, a, "Dinner", 100, &[a, b]).unwrap();
        h.gateway.mint(b, 100).unwrap();
        h.gateway.approve(b, h.service, 100);

        let err = h.engine.settle_debt(g, b, a, 51).unwrap_err();
        assert_eq!(
            ledger_error(err),
            LedgerError::InsufficientDebt {
                requested: 51,
                owed: 50
            }
        );
        assert_eq!(h.gateway.balance_of(b), 100);
    }

    #[test]
    fn outsiders_cannot_mutate_a_group() {
        let h = harness();
        let (a, b, c) = principals();
        let g = h.engine.create_group(a, "Pair", &[b]).unwrap();

        let err = h.engine.add_expense(g, c, "Gift", 10, &[a, b]).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::NotGroupMember { .. }));

        let err = h.engine.settle_debt(g, c, a, 1).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::NotGroupMember { .. }));

        let err = h.engine.settle_debt_native(g, c, a, 1).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::NotGroupMember { .. }));

        let err = h.engine.simplify_debts(g, c).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::NotGroupMember { .. }));
    }

    #[test]
    fn zero_amount_expense_changes_nothing() {
        let h = harness();
        let (a, b, c) = principals();
        let g = h.engine.create_group(a, "Trip", &[b, c]).unwrap();
        h.engine.add_expense(g, a, "Dinner", 90, &[a, b, c]).unwrap();
        let before = h.engine.debt_graph(g);

        let err = h.engine.add_expense(g, a, "Empty", 0, &[a, b, c]).unwrap_err();
        assert_eq!(ledger_error(err), LedgerError::InvalidAmount);
        assert_eq!(h.engine.debt_graph(g), before);
        assert_eq!(h.engine.expenses(g).unwrap().len(), 1);
    }

    #[test]
    fn fresh_group_has_an_empty_graph() {
        let h = harness();
        let (a, b, _) = principals();
        let g = h.engine.create_group(a, "New", &[b]).unwrap();

        let graph = h.engine.debt_graph(g);
        assert!(graph.debtors.is_empty());
        assert!(graph.creditors.is_empty());
        assert!(graph.amounts.is_empty());
    }

    #[test]
    fn graph_is_sorted_by_debtor_then_creditor() {
        let h = harness();
        let (a, b, c) = principals();
        let g = h.engine.create_group(c, "Trip", &[a, b]).unwrap();
        h.engine.add_expense(g, c, "Hotel", 30, &[a, b, c]).unwrap();
        h.engine.add_expense(g, b, "Fuel", 20, &[a, b]).unwrap();

        let graph = h.engine.debt_graph(g);
        assert_eq!(graph.debtors, vec![a, a, b]);
        assert_eq!(graph.creditors, vec![b, c, c]);
        assert_eq!(graph.amounts, vec![10, 10, 10]);
    }

    #[test]
    fn group_creation_rules() {
        let h = harness();
        let (a, b, c) = principals();

        let err = h.engine.create_group(a, "Solo", &[]).unwrap_err();
        assert_eq!(ledger_error(err), LedgerError::InsufficientMembers { found: 1 });
        let err = h.engine.create_group(a, "Echo", &[a, a]).unwrap_err();
        assert_eq!(ledger_error(err), LedgerError::InsufficientMembers { found: 1 });
        assert_eq!(h.engine.group_count(), 0);

        let first = h.engine.create_group(a, "One", &[b]).unwrap();
        let second = h.engine.create_group(b, "Two", &[c, a]).unwrap();
        assert_eq!(first, GroupId::new(0));
        assert_eq!(second, GroupId::new(1));
        assert_eq!(h.engine.group_count(), 2);

        assert_eq!(h.engine.members(second).unwrap(), vec![b, c, a]);
        assert_eq!(h.engine.group_name(second).unwrap(), "Two");
        assert_eq!(h.engine.group(second).unwrap().creator, b);
    }

    #[test]
    fn join_is_idempotent_rejecting() {
        let h = harness();
        let (a, b, c) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();

        h.engine.join_group(g, c).unwrap();
        assert!(h.engine.is_member(g, c));

        let err = h.engine.join_group(g, c).unwrap_err();
        assert!(matches!(ledger_error(err), LedgerError::AlreadyMember { .. }));
        assert_eq!(h.engine.members(g).unwrap().len(), 3);

        let err = h.engine.join_group(GroupId::new(7), c).unwrap_err();
        assert_eq!(ledger_error(err), LedgerError::UnknownGroup(GroupId::new(7)));
    }

    #[test]
    fn unknown_group_reads_are_empty() {
        let h = harness();
        let (a, b, _) = principals();
        let g = GroupId::new(3);

        assert_eq!(h.engine.get_debt(g, a, b), 0);
        assert!(h.engine.debt_graph(g).is_empty());
        assert!(!h.engine.is_member(g, a));
        assert!(matches!(
            h.engine.history(g).map_err(ledger_error),
            Err(LedgerError::UnknownGroup(_))
        ));
        assert!(matches!(
            h.engine.members(g).map_err(ledger_error),
            Err(LedgerError::UnknownGroup(_))
        ));
    }

    #[test]
    fn positions_sum_each_side() {
        let h = harness();
        let (a, b, c) = principals();
        let g = h.engine.create_group(a, "Trip", &[b, c]).unwrap();
        h.engine.add_expense(g, a, "Hotel", 90, &[a, b, c]).unwrap();
        h.engine.add_expense(g, b, "Fuel", 20, &[b, c]).unwrap();

        let positions = h.engine.positions(g).unwrap();
        let of = |p| positions.iter().find(|pos| pos.member == p).copied().unwrap();

        assert_eq!((of(a).owed_to_member, of(a).owed_by_member), (60, 0));
        assert_eq!((of(b).owed_to_member, of(b).owed_by_member), (10, 30));
        assert_eq!((of(c).owed_to_member, of(c).owed_by_member), (0, 40));
    }

    #[test]
    fn journal_replay_matches_live_state() {
        let h = harness();
        let (a, b, c) = principals();
        let g = h.engine.create_group(a, "Trip", &[b]).unwrap();
        h.engine.join_group(g, c).unwrap();
        h.engine.add_expense(g, a, "Hotel", 90, &[a, b, c]).unwrap();
        h.engine.add_expense(g, b, "Fuel", 60, &[a, b]).unwrap();
        h.engine.simplify_debts(g, c).unwrap();
        h.gateway.deposit_native(c, 100).unwrap();
        h.engine.settle_debt_native(g, c, a, 10).unwrap();

        let history = h.engine.history(g).unwrap();
        let seqs: Vec<u64> = history.iter().map(|r| r.sequence_number()).collect();
        assert_eq!(seqs, (1..=6).collect::<Vec<_>>());

        let rebuilt = GroupLedger::replay(g, history.iter().map(|r| r.payload()));
        assert_eq!(rebuilt.graph(), h.engine.debt_graph(g));
        assert_eq!(rebuilt.members(), h.engine.members(g).unwrap().as_slice());
        assert_eq!(rebuilt.expenses(), h.engine.expenses(g).unwrap().as_slice());
        assert!(matches!(
            history.last().map(|r| r.payload()),
            Some(LedgerEvent::DebtSettled(_))
        ));
    }

    #[test]
    fn concurrent_writers_on_one_group_serialize() {
        let h = Arc::new(harness());
        let (a, b, c) = principals();
        let g = h.engine.create_group(a, "Busy", &[b, c]).unwrap();

        let workers: Vec<_> = [a, b, c]
            .into_iter()
            .map(|payer| {
                let h = h.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        h.engine.add_expense(g, payer, "Round", 3, &[a, b, c]).unwrap();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        for (x, y) in [(a, b), (a, c), (b, a), (b, c), (c, a), (c, b)] {
            assert_eq!(h.engine.get_debt(g, x, y), 200);
        }
        assert_eq!(h.engine.expenses(g).unwrap().len(), 600);
        assert_eq!(h.engine.history(g).unwrap().len(), 601);
    }

    #[test]
    fn groups_progress_independently_in_parallel() {
        let h = Arc::new(harness());
        let (a, b, _) = principals();
        let groups: Vec<GroupId> = (0..4)
            .map(|i| h.engine.create_group(a, format!("g{i}"), &[b]).unwrap())
            .collect();

        let workers: Vec<_> = groups
            .iter()
            .copied()
            .map(|g| {
                let h = h.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        h.engine.add_expense(g, a, "Tick", 2, &[a, b]).unwrap();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        for g in groups {
            assert_eq!(h.engine.get_debt(g, b, a), 100);
        }
    }

    struct BrokenBus;

    impl EventBus<JournalRecord> for BrokenBus {
        type Error = &'static str;

        fn publish(&self, _message: JournalRecord) -> Result<(), Self::Error> {
            Err("offline")
        }

        fn subscribe(&self) -> Subscription<JournalRecord> {
            let (_tx, rx) = mpsc::channel();
            Subscription::new(rx)
        }
    }

    #[test]
    fn notification_failure_does_not_fail_the_operation() {
        let engine = SplitLedgerEngine::new(
            EngineConfig::default(),
            InMemoryValueGateway::new(),
            BrokenBus,
        );
        let (a, b, _) = principals();

        let g = engine.create_group(a, "Quiet", &[b]).unwrap();
        engine.add_expense(g, a, "Lunch", 20, &[a, b]).unwrap();
        assert_eq!(engine.get_debt(g, b, a), 10);
        assert_eq!(engine.history(g).unwrap().len(), 2);
    }

    /// Journal that stores everything except settlements.
    struct NoSettlementJournal(InMemoryJournal);

    impl Journal for NoSettlementJournal {
        fn append(
            &self,
            group_id: GroupId,
            expected_version: u64,
            events: &[LedgerEvent],
        ) -> Result<Vec<JournalRecord>, JournalError> {
            if events.iter().any(|e| matches!(e, LedgerEvent::DebtSettled(_))) {
                return Err(JournalError::Unavailable("disk full".into()));
            }
            self.0.append(group_id, expected_version, events)
        }

        fn load(&self, group_id: GroupId) -> Result<Vec<JournalRecord>, JournalError> {
            self.0.load(group_id)
        }
    }

    #[test]
    fn journal_failure_reverses_the_settlement_transfer() {
        let gateway = Arc::new(InMemoryValueGateway::new());
        let bus = Arc::new(InMemoryEventBus::<JournalRecord>::new());
        let config = EngineConfig::default();
        let service = config.service_principal;
        let engine = SplitLedgerEngine::with_journal(
            config,
            gateway.clone(),
            bus.clone(),
            NoSettlementJournal(InMemoryJournal::new()),
        );
        let sub = bus.subscribe();
        let (a, b, _) = principals();

        let g = engine.create_group(a, "Trip", &[b]).unwrap();
        engine.add_expense(g, a, "Dinner", 100, &[a, b]).unwrap();
        gateway.mint(b, 100).unwrap();
        gateway.approve(b, service, 50);
        gateway.deposit_native(b, 30).unwrap();
        sub.drain();

        let err = engine.settle_debt(g, b, a, 50).unwrap_err();
        assert!(matches!(err, EngineError::Journal(JournalError::Unavailable(_))));
        assert_eq!(engine.get_debt(g, b, a), 50);
        assert_eq!(gateway.balance_of(b), 100);
        assert_eq!(gateway.balance_of(a), 0);
        assert_eq!(gateway.allowance(b, service), 50);

        let err = engine.settle_debt_native(g, b, a, 30).unwrap_err();
        assert_eq!(err.kind(), "journal_failure");
        assert_eq!(engine.get_debt(g, b, a), 50);
        assert_eq!(gateway.native_balance_of(b), 30);
        assert_eq!(gateway.native_balance_of(a), 0);

        assert_eq!(engine.history(g).unwrap().len(), 2);
        assert!(sub.drain().is_empty());

        // The aggregate is still in step with the journal.
        engine.add_expense(g, b, "Coffee", 10, &[a, b]).unwrap();
        assert_eq!(engine.history(g).unwrap().len(), 3);
    }
}
