//! Integration tests for the SKU relay
//!
//! Drive the axum router in-process against scripted transports and check
//! the outward JSON contract for every lookup outcome.

#[path = "integration/api_contract.rs"]
mod api_contract;

#[path = "integration/fault_logging.rs"]
mod fault_logging;

#[path = "integration/support.rs"]
mod support;
