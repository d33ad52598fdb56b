//! Engine wiring for the HTTP process.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use splitledger_core::GroupId;
use splitledger_events::{EventBus, InMemoryBusError, InMemoryEventBus, Subscription};
use splitledger_infra::{EngineConfig, InMemoryValueGateway, JournalRecord, SplitLedgerEngine};

const REALTIME_CAPACITY: usize = 1024;

/// Notification bus for the server: in-process subscribers plus a lossy
/// broadcast feeding the SSE endpoint.
#[derive(Debug)]
pub struct RealtimeBus {
    inner: InMemoryEventBus<JournalRecord>,
    realtime_tx: broadcast::Sender<JournalRecord>,
}

impl RealtimeBus {
    pub fn new() -> Self {
        let (realtime_tx, _) = broadcast::channel(REALTIME_CAPACITY);
        Self {
            inner: InMemoryEventBus::new(),
            realtime_tx,
        }
    }

    pub fn realtime(&self) -> broadcast::Receiver<JournalRecord> {
        self.realtime_tx.subscribe()
    }
}

impl Default for RealtimeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus<JournalRecord> for RealtimeBus {
    type Error = InMemoryBusError;

    fn publish(&self, message: JournalRecord) -> Result<(), Self::Error> {
        // No SSE listeners is not an error.
        let _ = self.realtime_tx.send(message.clone());
        self.inner.publish(message)
    }

    fn subscribe(&self) -> Subscription<JournalRecord> {
        self.inner.subscribe()
    }
}

pub type Engine = SplitLedgerEngine<Arc<InMemoryValueGateway>, Arc<RealtimeBus>>;

/// Shared state behind every handler.
pub struct AppServices {
    engine: Engine,
    wallet: Arc<InMemoryValueGateway>,
    bus: Arc<RealtimeBus>,
}

impl AppServices {
    pub fn new(config: EngineConfig) -> Self {
        let wallet = Arc::new(InMemoryValueGateway::new());
        let bus = Arc::new(RealtimeBus::new());
        tracing::info!(
            service_principal = %config.service_principal,
            overpayment = ?config.overpayment,
            "engine configured"
        );

        Self {
            engine: SplitLedgerEngine::new(config, wallet.clone(), bus.clone()),
            wallet,
            bus,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Dev wallet behind the engine's value gateway.
    pub fn wallet(&self) -> &InMemoryValueGateway {
        &self.wallet
    }

    pub fn bus(&self) -> &RealtimeBus {
        &self.bus
    }
}

/// SSE stream of one group's committed events.
pub fn group_sse_stream(
    services: Arc<AppServices>,
    group_id: GroupId,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.bus().realtime();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(record) if record.group_id() == group_id => {
            let data = serde_json::to_string(record.payload()).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default()
                .event(record.event_type())
                .id(record.sequence_number().to_string())
                .data(data)))
        }
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
