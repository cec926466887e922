// Configuration module entry point
// Loads the startup configuration and builds the shared runtime state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, MimeConfig, PerformanceConfig, ServerConfig,
};

use crate::error::StartupError;

/// Environment variable prefix, e.g. `DEVSERVE_SERVER__PORT=9000`
const ENV_PREFIX: &str = "DEVSERVE";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// `server.host` must be an IP literal, IPv4 or IPv6 (`::`, `::1`)
    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let host = &self.server.host;
        let ip: IpAddr = host
            .parse()
            .map_err(|e| StartupError::InvalidAddress(format!("{host}: {e}")))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
