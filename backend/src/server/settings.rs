//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `CONTACTS_*` environment variables, an optional
//! configuration file, and command-line flags, in the usual OrthoConfig order.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Settings controlling how the server binds and which user store it uses.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONTACTS")]
pub struct ServerSettings {
    /// Address to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    /// Port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL. Without one the server keeps users in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Apply pending migrations before accepting traffic.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Socket address derived from `host` and `port`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port)
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
