use std::net::SocketAddrV4;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{Context, Error};

const DEFAULT_HOST_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_KEEP_ALIVE_SECS: u64 = 15;
const DEFAULT_STREAM_BUFFER_SIZE: usize = 64;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Server configs
#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub addr: SocketAddrV4,
    pub stream: StreamConfig,
    pub shutdown_timeout: Duration,
}

/// Live order stream settings
#[derive(Debug, Clone, Copy)]
pub(crate) struct StreamConfig {
    /// interval between `: keep-alive` frames
    pub keep_alive: Duration,
    /// events buffered per subscriber before new ones are dropped
    pub buffer_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            keep_alive: Duration::from_secs(DEFAULT_KEEP_ALIVE_SECS),
            buffer_size: DEFAULT_STREAM_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source, falling back to defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or(DEFAULT_HOST_ADDR.to_string());
        let addr = SocketAddrV4::from_str(&host).with_context(|| format!("failed to parse HOST={host}"))?;

        let keep_alive_secs = parse_or("STREAM_KEEP_ALIVE_SECS", &lookup, DEFAULT_KEEP_ALIVE_SECS)?;
        if keep_alive_secs == 0 {
            anyhow::bail!("STREAM_KEEP_ALIVE_SECS must be greater than zero");
        }
        let buffer_size = parse_or("STREAM_BUFFER_SIZE", &lookup, DEFAULT_STREAM_BUFFER_SIZE)?;
        if buffer_size == 0 {
            anyhow::bail!("STREAM_BUFFER_SIZE must be greater than zero");
        }
        let shutdown_secs = parse_or("SHUTDOWN_TIMEOUT_SECS", &lookup, DEFAULT_SHUTDOWN_TIMEOUT_SECS)?;

        Ok(Self {
            addr,
            stream: StreamConfig {
                keep_alive: Duration::from_secs(keep_alive_secs),
                buffer_size,
            },
            shutdown_timeout: Duration::from_secs(shutdown_secs),
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().with_context(|| format!("failed to parse {key}={raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_HOST_ADDR);
        assert_eq!(config.stream.keep_alive, Duration::from_secs(15));
        assert_eq!(config.stream.buffer_size, 64);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HOST", "0.0.0.0:9000"),
            ("STREAM_KEEP_ALIVE_SECS", "5"),
            ("STREAM_BUFFER_SIZE", "8"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.stream.keep_alive, Duration::from_secs(5));
        assert_eq!(config.stream.buffer_size, 8);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ServerConfig::from_lookup(lookup_from(&[("HOST", "localhost")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("STREAM_BUFFER_SIZE", "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("STREAM_KEEP_ALIVE_SECS", "soon")])).is_err());
    }
}
