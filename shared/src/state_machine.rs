//! Connection State Machine
//!
//! Defines the lifecycle of the single session to the LED device and which
//! events may move it between states.

use std::fmt;

/// Observable status of the device session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Failed(reason) => write!(f, "Failed - {}", reason),
        }
    }
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Caller asked for a (re)connect
    ConnectRequested,
    /// Transport is up
    Established,
    /// Transport could not be established
    ConnectFailed(String),
    /// A write on an established transport failed
    SendFailed(String),
    /// Explicit shutdown
    Closed,
}

/// Result of a state transition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition was valid and state changed
    Success {
        from: ConnectionState,
        to: ConnectionState,
    },
    /// Transition was invalid from current state; state is unchanged
    Invalid {
        from: ConnectionState,
        event: ConnectionEvent,
    },
}

/// The connection state machine
#[derive(Debug, Default)]
pub struct ConnectionStateMachine {
    current_state: ConnectionState,
}

impl ConnectionStateMachine {
    /// Create a new state machine in Disconnected state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current state
    pub fn state(&self) -> &ConnectionState {
        &self.current_state
    }

    /// Process an event and return the transition result
    pub fn process_event(&mut self, event: ConnectionEvent) -> TransitionResult {
        match self.next_state(&event) {
            Some(state) => {
                let from = std::mem::replace(&mut self.current_state, state.clone());
                TransitionResult::Success { from, to: state }
            }
            None => TransitionResult::Invalid {
                from: self.current_state.clone(),
                event,
            },
        }
    }

    /// Get the next state for a given event, if the transition is valid
    fn next_state(&self, event: &ConnectionEvent) -> Option<ConnectionState> {
        use ConnectionEvent::*;
        use ConnectionState::*;

        match (&self.current_state, event) {
            // Shutdown is allowed from anywhere
            (_, Closed) => Some(Disconnected),

            // Reconnect is always explicit; Connected is allowed so a caller
            // can force a fresh session
            (Disconnected | Failed(_) | Connected, ConnectRequested) => Some(Connecting),

            (Connecting, Established) => Some(Connected),
            (Connecting, ConnectFailed(reason)) => Some(Failed(reason.clone())),

            (Connected, SendFailed(reason)) => Some(Failed(reason.clone())),

            _ => None,
        }
    }
}
