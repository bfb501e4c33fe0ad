//! Controller - validates intents and dispatches them to the device

use super::intent::Intent;
use crate::connection::{ConnectionManager, StateChange};
use crate::error::ControlError;
use crate::transport::TransportConnector;
use ledremote_shared::{codec, Command, ConnectionState};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Single entry point for the control surface.
///
/// Each `apply` turns one intent into one write. Calls are expected one at a
/// time (`&mut self`); a service sharing a controller between tasks should
/// put it behind a `tokio::sync::Mutex`.
///
/// `connect` and `apply` are not cancellable mid-flight. A caller that wraps
/// them in its own timeout should call `close()` once that timeout elapses,
/// which releases any handle and returns the state to `Disconnected`.
pub struct Controller<C: TransportConnector> {
    connection: ConnectionManager<C>,
}

impl<C: TransportConnector> Controller<C> {
    pub fn new(connection: ConnectionManager<C>) -> Self {
        Self { connection }
    }

    /// Explicit (re)connect; the outcome is also published to the subscriber
    pub async fn connect(&mut self) -> ConnectionState {
        self.connection.connect().await
    }

    /// Validate, encode and send one intent
    pub async fn apply(&mut self, intent: Intent) -> Result<(), ControlError> {
        let command = Command::try_from(intent).map_err(|e| {
            warn!("Rejected {:?}: {}", intent, e);
            e
        })?;
        self.dispatch(command).await
    }

    /// Send an already validated command
    pub async fn dispatch(&mut self, command: Command) -> Result<(), ControlError> {
        let bytes = codec::encode(&command);
        self.connection.send(&bytes).await?;
        info!("Sent command: {}", command);
        Ok(())
    }

    pub async fn close(&mut self) {
        self.connection.close().await;
    }

    pub fn state(&self) -> &ConnectionState {
        self.connection.state()
    }

    /// Subscribe to connection state changes (one subscriber at a time)
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        self.connection.subscribe()
    }
}
