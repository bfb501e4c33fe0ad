//! Connection manager owning the single session to the LED device

use super::config::ConnectionConfig;
use crate::error::TransportError;
use crate::transport::{TransportConnector, TransportStream};
use ledremote_shared::{
    protocol, ConnectionEvent, ConnectionState, ConnectionStateMachine, TransitionResult,
};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// A published state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

/// Owns the transport handle and the connection state machine.
///
/// The handle exists only while the state is `Connected`. It is released on
/// `close`, on any transition into `Failed`, before every new connect, and
/// when the manager is dropped. Nothing here retries: every reconnect comes
/// from an explicit `connect` call.
pub struct ConnectionManager<C: TransportConnector> {
    connector: C,
    config: ConnectionConfig,
    fsm: ConnectionStateMachine,
    stream: Option<C::Stream>,
    subscriber: Option<mpsc::UnboundedSender<StateChange>>,
}

impl<C: TransportConnector> ConnectionManager<C> {
    /// Create a disconnected manager; no I/O happens until `connect`
    pub fn new(connector: C, config: ConnectionConfig) -> Self {
        Self {
            connector,
            config,
            fsm: ConnectionStateMachine::new(),
            stream: None,
            subscriber: None,
        }
    }

    /// Current connection state
    pub fn state(&self) -> &ConnectionState {
        self.fsm.state()
    }

    /// Receive every state change from now on. Only one subscriber is kept;
    /// subscribing again detaches the previous receiver.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriber = Some(tx);
        rx
    }

    /// Make one connection attempt and return the resulting state.
    ///
    /// The attempt is bounded by `connect_timeout`. If a caller drops this
    /// future early (for example under its own outer timeout) the state is
    /// left at `Connecting`; follow up with `close()` or another `connect()`.
    pub async fn connect(&mut self) -> ConnectionState {
        self.release().await;
        self.transition(ConnectionEvent::ConnectRequested);

        info!(
            "Connecting to {} via {}",
            self.connector.target(),
            self.connector.name()
        );

        let attempt = timeout(self.config.connect_timeout, self.connector.connect()).await;
        let stream = match attempt {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                let reason = format!("{:#}", e);
                error!("Connection failed: {}", reason);
                self.transition(ConnectionEvent::ConnectFailed(reason));
                return self.state().clone();
            }
            Err(_) => {
                let reason = format!(
                    "Connect to {} timed out after {:?}",
                    self.connector.target(),
                    self.config.connect_timeout
                );
                error!("Connection failed: {}", reason);
                self.transition(ConnectionEvent::ConnectFailed(reason));
                return self.state().clone();
            }
        };

        let stream = self.stream.insert(stream);
        read_greeting(stream, self.config.greeting_timeout).await;

        self.transition(ConnectionEvent::Established);
        info!("Connected to {}", self.connector.target());
        self.state().clone()
    }

    /// Write one encoded command.
    ///
    /// Fails with `NotConnected` without any I/O unless the state is
    /// `Connected`. A transport error or an elapsed `send_timeout` drops the
    /// handle and moves the state to `Failed`; the bytes are not requeued.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if !self.fsm.state().is_connected() {
            debug!("Send refused: state is {}", self.fsm.state());
            return Err(TransportError::NotConnected);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(TransportError::NotConnected);
        };

        let result = match peer_hangup(stream).await {
            Some(e) => Err(e),
            None => write_command(stream, bytes, self.config.send_timeout).await,
        };

        match result {
            Ok(()) => {
                debug!("Sent {} bytes", bytes.len());
                Ok(())
            }
            Err(e) => {
                error!("Error sending command: {}", e);
                // Dropping the stream closes the socket
                self.stream = None;
                self.transition(ConnectionEvent::SendFailed(format!("Connection lost: {}", e)));
                Err(TransportError::SendFailed(e))
            }
        }
    }

    /// Shut the session down and return to `Disconnected`
    pub async fn close(&mut self) {
        self.release().await;
        self.transition(ConnectionEvent::Closed);
    }

    /// Gracefully shut down and drop the current handle, if any
    async fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = TransportStream::shutdown(&mut stream).await {
                debug!("Transport shutdown error (ignored): {:#}", e);
            }
        }
    }

    fn transition(&mut self, event: ConnectionEvent) {
        match self.fsm.process_event(event) {
            TransitionResult::Success { from, to } => {
                if from == to {
                    return;
                }
                info!("Status: {} -> {}", from, to);
                let delivered = self
                    .subscriber
                    .as_ref()
                    .map(|tx| tx.send(StateChange { from, to }).is_ok());
                if delivered == Some(false) {
                    // Receiver went away
                    self.subscriber = None;
                }
            }
            TransitionResult::Invalid { from, event } => {
                warn!("Ignoring {:?} while {}", event, from);
            }
        }
    }
}

/// Read and log the device greeting. It is informational only: silence, an
/// early close or a read error never blocks the connection.
async fn read_greeting<S: TransportStream>(stream: &mut S, wait: Duration) {
    let mut buf = vec![0u8; protocol::GREETING_MAX_LEN];
    match timeout(wait, stream.read(&mut buf)).await {
        Ok(Ok(0)) => warn!("Device closed its side before sending a greeting"),
        Ok(Ok(n)) => info!("Server: {}", String::from_utf8_lossy(&buf[..n]).trim_end()),
        Ok(Err(e)) => warn!("Failed to read greeting: {}", e),
        Err(_) => debug!("No greeting within {:?}", wait),
    }
}

/// Poll the read side once without waiting. The device never talks after
/// its greeting, so end-of-stream here means it hung up.
async fn peer_hangup<S: TransportStream>(stream: &mut S) -> Option<io::Error> {
    let mut scratch = [0u8; 64];
    match timeout(Duration::ZERO, stream.read(&mut scratch)).await {
        Ok(Ok(0)) => Some(io::Error::new(
            io::ErrorKind::ConnectionAborted,
            "device closed the connection",
        )),
        Ok(Ok(n)) => {
            debug!(
                "Unsolicited device output: {}",
                String::from_utf8_lossy(&scratch[..n]).trim_end()
            );
            None
        }
        Ok(Err(e)) => Some(e),
        Err(_) => None,
    }
}

async fn write_command<S: TransportStream>(
    stream: &mut S,
    bytes: &[u8],
    limit: Duration,
) -> io::Result<()> {
    let write = async {
        stream.write_all(bytes).await?;
        stream.flush().await
    };
    match timeout(limit, write).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("send timed out after {:?}", limit),
        )),
    }
}
