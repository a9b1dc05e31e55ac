//! Server Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

/// Server runtime network settings.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Deadline applied to every database statement run for a request
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub request_timeout_ms: u64,

    /// Built frontend to serve for non-API paths, when present
    #[arg(long, env = "STATIC_DIR", default_value = "web/frontend/dist")]
    pub static_dir: PathBuf,
}

impl ServerRuntimeConfig {
    /// Get the socket address for binding.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The static directory, if it exists on disk.
    #[must_use]
    pub fn frontend_dir(&self) -> Option<PathBuf> {
        self.static_dir.is_dir().then(|| self.static_dir.clone())
    }
}
