//! Control facade used by the control surface
//!
//! This module handles:
//! - Parsing and validating user intents
//! - Encoding them into device commands
//! - Dispatching through the connection manager

mod controller;
mod intent;

pub use controller::Controller;
pub use intent::Intent;
