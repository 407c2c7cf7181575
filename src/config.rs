//! Configuration module
//!
//! The configuration is built once at startup and stays immutable for the
//! process lifetime. Sources, in order of precedence: `CORSERVE_`-prefixed
//! environment variables, an optional `config.toml`, then the defaults
//! declared on each field.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub serve: ServeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServeConfig {
    /// Directory to serve. When unset, the directory containing the server
    /// executable is used, so a deployed bundle serves its own files no
    /// matter where it is launched from.
    #[serde(default)]
    pub root: Option<String>,
    /// Files tried in order when a directory is requested
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_access_log")]
    pub access_log: bool,
    /// Access log format: "common", "combined" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

const fn default_access_log() -> bool {
    true
}

fn default_log_format() -> String {
    "common".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: None,
            index_files: default_index_files(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: default_access_log(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from the default `config.toml` location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("CORSERVE"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Resolve the serving root to a canonical absolute path.
    ///
    /// Defaults to the directory containing the running executable, matching
    /// the install-location behavior rather than the working directory.
    pub fn resolve_root(&self) -> std::io::Result<PathBuf> {
        let root = match &self.serve.root {
            Some(dir) => PathBuf::from(dir),
            None => {
                let exe = std::env::current_exe()?;
                exe.parent().map(Path::to_path_buf).ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "executable has no parent directory",
                    )
                })?
            }
        };
        root.canonicalize()
    }
}

/// Shared read-only per-request state
pub struct AppState {
    pub config: Config,
    /// Canonical serving root, resolved once at startup
    pub root: PathBuf,
}

impl AppState {
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }
}
