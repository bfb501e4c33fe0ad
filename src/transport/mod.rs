#[cfg(test)]
pub mod mock;
pub mod tcp;
pub mod traits;

pub use tcp::{TcpConnector, TcpTransportStream};
pub use traits::{TransportConnector, TransportStream};
