//! LED Remote Shared Protocol Types
//!
//! This crate provides the command model, value validation, wire codec and
//! connection state machine shared by the remote control client and the
//! device simulator.

pub mod codec;
pub mod command;
pub mod state_machine;

pub use command::{Command, Direction, Effect, Level, Preset, Rgb, ValidationError};
pub use state_machine::{ConnectionEvent, ConnectionState, ConnectionStateMachine, TransitionResult};

/// Protocol parameters for the LED device
pub mod protocol {
    /// Address the device listens on out of the box
    pub const DEFAULT_HOST: &str = "192.168.1.109";

    /// TCP port of the command server
    pub const DEFAULT_PORT: u16 = 50000;

    /// Upper bound for the greeting the device sends after accept
    pub const GREETING_MAX_LEN: usize = 1024;
}
