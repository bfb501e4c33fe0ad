//! Development stand-in for the LED controller.
//!
//! Accepts connections on the command port, sends a greeting and logs every
//! command it receives. It never replies to commands, like the real device.

use ledremote_shared::protocol;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_GREETING: &str = "Connected to LED server";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let bind = std::env::var("LED_SIM_BIND")
        .unwrap_or_else(|_| format!("0.0.0.0:{}", protocol::DEFAULT_PORT));
    let greeting =
        std::env::var("LED_SIM_GREETING").unwrap_or_else(|_| DEFAULT_GREETING.to_string());

    let listener = TcpListener::bind(&bind).await?;
    info!("LED device simulator listening on {}", bind);

    loop {
        let (socket, addr) = listener.accept().await?;
        info!("Connection from: {}", addr);

        let greeting = greeting.clone();
        tokio::spawn(async move {
            if let Err(e) = serve(socket, addr, &greeting).await {
                error!("Session with {} ended with error: {:#}", addr, e);
            }
        });
    }
}

async fn serve(mut socket: TcpStream, addr: SocketAddr, greeting: &str) -> anyhow::Result<()> {
    socket.write_all(greeting.as_bytes()).await?;

    let mut buf = vec![0u8; 4096];
    loop {
        match socket.read(&mut buf).await? {
            0 => {
                info!("Client disconnected: {}", addr);
                return Ok(());
            }
            // No delimiter on the wire: one read is usually one command,
            // but back-to-back writes can arrive merged
            n => match std::str::from_utf8(&buf[..n]) {
                Ok(text) => info!("[{}] {}", addr, text),
                Err(_) => warn!("[{}] non UTF-8 payload: {:02X?}", addr, &buf[..n]),
            },
        }
    }
}
