//! In-memory transport for tests
//!
//! Records every byte written and lets a test fail connects, break the pipe
//! or simulate the device hanging up, without touching a socket.

use crate::transport::traits::{TransportConnector, TransportStream};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

#[derive(Debug, Default)]
struct MockState {
    connects: usize,
    writes: Vec<Vec<u8>>,
    shutdowns: usize,
    refuse: bool,
    greeting: Option<Vec<u8>>,
    broken: bool,
    peer_closed: bool,
    stall_connect: bool,
    stall_writes: bool,
    hangup_on_connect: bool,
    fail_reads: bool,
}

/// Shared view of everything the mock transport saw
#[derive(Debug, Clone, Default)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockHandle {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    /// Each completed `poll_write`, as text
    pub fn writes(&self) -> Vec<String> {
        self.lock()
            .writes
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    pub fn shutdowns(&self) -> usize {
        self.lock().shutdowns
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.lock().refuse = refuse;
    }

    pub fn set_greeting(&self, greeting: &str) {
        self.lock().greeting = Some(greeting.as_bytes().to_vec());
    }

    /// Next write fails with a broken pipe
    pub fn break_pipe(&self) {
        self.lock().broken = true;
    }

    /// Reads report end-of-stream, as after the device closes its side
    pub fn close_peer(&self) {
        self.lock().peer_closed = true;
    }

    /// Connect attempts never complete
    pub fn stall_connect(&self) {
        self.lock().stall_connect = true;
    }

    /// Writes never complete
    pub fn stall_writes(&self) {
        self.lock().stall_writes = true;
    }

    /// The device hangs up right after accepting, before any greeting
    pub fn hangup_on_connect(&self) {
        self.lock().hangup_on_connect = true;
    }

    /// Every read fails with a connection reset
    pub fn fail_reads(&self) {
        self.lock().fail_reads = true;
    }
}

pub struct MockConnector {
    handle: MockHandle,
}

impl MockConnector {
    pub fn new() -> (Self, MockHandle) {
        let handle = MockHandle::default();
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }
}

#[async_trait]
impl TransportConnector for MockConnector {
    type Stream = MockStream;

    async fn connect(&self) -> Result<Self::Stream> {
        let stall = self.handle.lock().stall_connect;
        if stall {
            std::future::pending::<()>().await;
        }

        let mut state = self.handle.lock();
        if state.refuse {
            return Err(anyhow!("Connection refused"));
        }
        state.connects += 1;
        state.broken = false;
        state.stall_writes = false;
        state.peer_closed = state.hangup_on_connect;
        let greeting = state.greeting.clone();
        drop(state);

        Ok(MockStream {
            handle: self.handle.clone(),
            greeting,
        })
    }

    fn name(&self) -> &'static str {
        "Mock"
    }

    fn target(&self) -> &str {
        "mock-device"
    }
}

pub struct MockStream {
    handle: MockHandle,
    greeting: Option<Vec<u8>>,
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.handle.lock().fail_reads {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "mock read failure",
            )));
        }
        if let Some(greeting) = self.greeting.take() {
            let n = greeting.len().min(buf.remaining());
            buf.put_slice(&greeting[..n]);
            return Poll::Ready(Ok(()));
        }
        if self.handle.lock().peer_closed {
            return Poll::Ready(Ok(()));
        }
        // The device stays silent after its greeting
        Poll::Pending
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut state = self.handle.lock();
        if state.stall_writes {
            return Poll::Pending;
        }
        if state.broken || state.peer_closed {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock pipe broken",
            )));
        }
        state.writes.push(buf.to_vec());
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[async_trait]
impl TransportStream for MockStream {
    async fn shutdown(&mut self) -> Result<()> {
        self.handle.lock().shutdowns += 1;
        Ok(())
    }
}
