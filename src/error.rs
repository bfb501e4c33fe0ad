//! Error types for the remote control client

use ledremote_shared::ValidationError;
use std::io;
use thiserror::Error;

/// Failures of the connection manager's send path
#[derive(Error, Debug)]
pub enum TransportError {
    /// No established session; nothing was written
    #[error("Not connected to device")]
    NotConnected,

    /// The transport rejected the write; the session is now failed
    #[error("Send failed: {0}")]
    SendFailed(#[source] io::Error),
}

/// Errors returned to the control surface by `Controller::apply`
#[derive(Error, Debug)]
pub enum ControlError {
    /// Rejected before any I/O took place
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not connected to device")]
    NotConnected,

    /// The command was lost; reconnecting is up to the caller
    #[error("Send failed: {0}")]
    SendFailed(#[source] io::Error),
}

impl From<TransportError> for ControlError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotConnected => ControlError::NotConnected,
            TransportError::SendFailed(e) => ControlError::SendFailed(e),
        }
    }
}
