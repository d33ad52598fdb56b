//! HTTP API over the split ledger engine.

pub mod app;
pub mod context;
pub mod middleware;
