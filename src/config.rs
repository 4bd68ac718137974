use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

static CONFIG: OnceCell<ServerConfig> = OnceCell::new();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Fail to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Fail to deserialize config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,

    /// Capacity of the per-connection read buffer. A request-line or header
    /// line that does not fit is rejected.
    pub buffer_size: usize,

    /// Deadline for each read from a client. `None` waits forever.
    #[serde(deserialize_with = "deserialize_duration")]
    pub read_timeout: Option<Duration>,

    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 42069,
            buffer_size: 1024,

            read_timeout: None,

            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ServerConfig>(content)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

/// Installs the process-wide config. Only the first call has an effect.
pub fn set_config(cfg: ServerConfig) {
    if CONFIG.set(cfg).is_err() {
        tracing::debug!("Config already set, keeping the first one");
    }
}

/// The process-wide config, or the defaults if none was installed.
pub fn config() -> &'static ServerConfig {
    CONFIG.get_or_init(ServerConfig::default)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = Option::<f64>::deserialize(deserializer)?;
    match secs {
        Some(s) if !s.is_finite() || s < 0.0 => Err(serde::de::Error::custom(
            "read_timeout must be a non-negative number of seconds",
        )),
        Some(s) => Ok(Some(Duration::from_secs_f64(s))),
        None => Ok(None),
    }
}
