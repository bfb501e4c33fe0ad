//! Remote control client for a TCP-attached addressable LED controller.
//!
//! The [`Controller`] is the entry point for a control surface: it validates
//! intents, encodes them with the shared command model and writes them over
//! the session owned by the [`ConnectionManager`].

pub mod connection;
pub mod console;
pub mod control;
pub mod error;
pub mod transport;

pub use connection::{ConnectionConfig, ConnectionManager, StateChange};
pub use control::{Controller, Intent};
pub use error::{ControlError, TransportError};
pub use ledremote_shared::{ConnectionState, Preset};
