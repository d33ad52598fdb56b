//! Value transfer boundary.
//!
//! The ledger never moves value itself; settlement goes through a
//! `ValueTransferGateway` and only touches debt once the gateway succeeded.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryValueGateway;
pub use r#trait::{GatewayError, Transfer, ValueTransferGateway};
