//! Infrastructure layer: value gateway, group storage, journal, and the
//! `SplitLedgerEngine` service that ties them to the pure ledger.

pub mod config;
pub mod engine;
pub mod gateway;
pub mod journal;
pub mod registry;

mod integration_tests;

pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineError, EngineResult, SplitLedgerEngine};
pub use gateway::{GatewayError, InMemoryValueGateway, Transfer, ValueTransferGateway};
pub use journal::{InMemoryJournal, Journal, JournalError, JournalRecord};
pub use registry::GroupRegistry;
