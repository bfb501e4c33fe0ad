//! Connection management for the LED device session
//!
//! This module handles:
//! - A single outbound TCP session with an explicit state machine
//! - Informational greeting read on connect
//! - Loss detection on send (no automatic reconnection)
//! - State change delivery to one subscriber

mod config;
mod manager;

pub use config::ConnectionConfig;
pub use manager::{ConnectionManager, StateChange};
