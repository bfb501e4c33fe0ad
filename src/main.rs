use anyhow::Result;
use led_remote::console::{self, ConsoleInput};
use led_remote::transport::TcpConnector;
use led_remote::{ConnectionConfig, ConnectionManager, Controller};
use tokio::io::{AsyncBufReadExt, BufReader};

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let mut config = ConnectionConfig::from_env();
    if let Some(address) = std::env::args().nth(1) {
        config.set_address(&address)?;
    }

    info!("LED remote starting");
    info!("  Device: {}", config.address());

    let connector = TcpConnector::new(config.address());
    let mut controller = Controller::new(ConnectionManager::new(connector, config));

    // Render every state change as the status line
    let mut changes = controller.subscribe();
    tokio::spawn(async move {
        while let Some(change) = changes.recv().await {
            println!("{}", console::status_line(&change.to));
        }
    });

    controller.connect().await;
    println!("{}", console::help_text());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match console::parse_line(&line) {
            Ok(ConsoleInput::Intent(intent)) => {
                if let Err(e) = controller.apply(intent).await {
                    error!("{}", e);
                    println!("Rejected: {}", e);
                }
            }
            Ok(ConsoleInput::Connect) => {
                controller.connect().await;
            }
            Ok(ConsoleInput::Status) => println!("{}", console::status_line(controller.state())),
            Ok(ConsoleInput::Help) => println!("{}", console::help_text()),
            Ok(ConsoleInput::Quit) => break,
            Ok(ConsoleInput::Blank) => {}
            Err(e) => println!("Rejected: {}", e),
        }
    }

    controller.close().await;
    info!("LED remote stopped");
    Ok(())
}
