//! Connection settings with environment overrides

use anyhow::{anyhow, Context, Result};
use ledremote_shared::protocol;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;

/// Configuration for the connection manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Device host name or IP
    pub host: String,
    /// Device command port
    pub port: u16,
    /// Bound on a single connect attempt
    pub connect_timeout: Duration,
    /// How long to wait for the optional greeting after connecting
    pub greeting_timeout: Duration,
    /// Bound on a single command write
    pub send_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: protocol::DEFAULT_HOST.into(),
            port: protocol::DEFAULT_PORT,
            connect_timeout: Duration::from_secs(5),
            greeting_timeout: Duration::from_secs(1),
            send_timeout: Duration::from_secs(5),
        }
    }
}

impl ConnectionConfig {
    /// Defaults overlaid with `LED_REMOTE_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`; bad values are ignored
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("LED_REMOTE_HOST") {
            config.host = v;
        }
        if let Some(v) = lookup("LED_REMOTE_PORT") {
            match v.trim().parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring LED_REMOTE_PORT={:?}: not a port number", v),
            }
        }
        if let Some(d) = duration_ms(&lookup, "LED_REMOTE_CONNECT_TIMEOUT_MS") {
            config.connect_timeout = d;
        }
        if let Some(d) = duration_ms(&lookup, "LED_REMOTE_GREETING_TIMEOUT_MS") {
            config.greeting_timeout = d;
        }
        if let Some(d) = duration_ms(&lookup, "LED_REMOTE_SEND_TIMEOUT_MS") {
            config.send_timeout = d;
        }

        config
    }

    /// Replace host and port from a `host:port` string. IPv6 literals must be
    /// bracketed, as in `[::1]:50000`.
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        let address = address.trim();
        if let Ok(addr) = address.parse::<SocketAddr>() {
            self.host = addr.ip().to_string();
            self.port = addr.port();
            return Ok(());
        }

        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("Expected host:port, got {:?}", address))?;
        if host.is_empty() {
            return Err(anyhow!("Missing host in {:?}", address));
        }
        if host.contains(':') {
            return Err(anyhow!(
                "Ambiguous address {:?}: wrap IPv6 hosts in brackets",
                address
            ));
        }
        self.port = port
            .parse()
            .with_context(|| format!("Invalid port in {:?}", address))?;
        self.host = host.to_string();
        Ok(())
    }

    /// `host:port` as dialled by the TCP connector, bracketing IPv6 hosts
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn duration_ms(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a number of milliseconds", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.address(), "192.168.1.109:50000");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LED_REMOTE_HOST", "10.0.0.7"),
            ("LED_REMOTE_PORT", "6000"),
            ("LED_REMOTE_SEND_TIMEOUT_MS", "250"),
        ]
        .into_iter()
        .collect();

        let config = ConnectionConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.address(), "10.0.0.7:6000");
        assert_eq!(config.send_timeout, Duration::from_millis(250));
        assert_eq!(config.greeting_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let config = ConnectionConfig::from_lookup(|k| match k {
            "LED_REMOTE_PORT" => Some("seventy".into()),
            "LED_REMOTE_CONNECT_TIMEOUT_MS" => Some("-5".into()),
            _ => None,
        });
        assert_eq!(config, ConnectionConfig::default());
    }

    #[test]
    fn test_set_address() {
        let mut config = ConnectionConfig::default();
        config.set_address("127.0.0.1:50001").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 50001);

        assert!(config.set_address("no-port").is_err());
        assert!(config.set_address(":80").is_err());
        assert!(config.set_address("host:99999").is_err());
        assert_eq!(config.address(), "127.0.0.1:50001");
    }

    #[test]
    fn test_set_address_ipv6() {
        let mut config = ConnectionConfig::default();
        config.set_address("[::1]:50000").unwrap();
        assert_eq!(config.host, "::1");
        assert_eq!(config.port, 50000);
        assert_eq!(config.address(), "[::1]:50000");

        // Unbracketed literals cannot be split reliably
        assert!(config.set_address("::1:50000").is_err());
        assert!(config.set_address("fe80::1:80").is_err());
        assert_eq!(config.address(), "[::1]:50000");
    }

    #[test]
    fn test_ipv6_host_from_env_is_bracketed() {
        let config = ConnectionConfig::from_lookup(|k| match k {
            "LED_REMOTE_HOST" => Some("fe80::1".into()),
            _ => None,
        });
        assert_eq!(config.address(), "[fe80::1]:50000");
    }
}
