//! Configuration from environment variables (and `.env` via dotenvy)

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_API_URL: &str = "https://milkandhoneybnb.com/api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CURRENCY: &str = "ZAR";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hotel API, without trailing `/clients` or `/quotes`
    pub api_url: String,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    /// Currency code attached to every money value in responses
    pub currency: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr: SocketAddr = var_or("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse()
            .context("BIND_ADDR must be host:port")?;
        let timeout_secs: u64 = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .context("API_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: var_or("HOTEL_API_URL", DEFAULT_API_URL),
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
            currency: var_or("CURRENCY", DEFAULT_CURRENCY),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
