use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::format::RemoteCapabilities;
use crate::processor::BatchConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    /// Remote conversion service. Absent means local-only conversion.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

/// Remote conversion service configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Base URL (e.g., "http://localhost:3000")
    pub url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Formats routed to the service
    #[serde(default)]
    pub formats: RemoteCapabilities,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            timeout_secs: default_timeout(),
            formats: RemoteCapabilities::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
