use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::{Result, ServerError};

/// Resolved server configuration.
///
/// Every field has a default, so a YAML file only needs to name the values
/// it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub tls: TlsSettings,
    /// Directory resources are served from.
    pub root: PathBuf,
    /// Extension table, relative to the working directory.
    pub mime_table: PathBuf,
    pub index_page: String,
    pub error_page: String,
    /// Upper bound of the single read that receives a request.
    pub max_request_bytes: usize,
    pub chunk_size: usize,
    pub recovery: RecoveryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    pub enabled: bool,
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Port range probed once the preferred port is unusable:
/// `base_port + 1 ..= base_port + max_attempts`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub base_port: u16,
    pub max_attempts: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4001,
            tls: TlsSettings::default(),
            root: PathBuf::from("."),
            mime_table: PathBuf::from("mime-types.tsv"),
            index_page: "index.html".to_string(),
            error_page: "error.html".to_string(),
            max_request_bytes: 1024,
            chunk_size: 2048,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            cert: PathBuf::from("webServCert.crt"),
            key: PathBuf::from("webServ.key"),
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            base_port: 4000,
            max_attempts: 50,
        }
    }
}

impl Config {
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let cfg: Self =
            serde_yaml::from_str(contents).map_err(|e| ServerError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&contents)
    }

    /// Loads `path` when given, the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.max_request_bytes == 0 {
            return Err(ServerError::Config("max_request_bytes must be positive".into()));
        }
        if self.chunk_size == 0 {
            return Err(ServerError::Config("chunk_size must be positive".into()));
        }
        let last = u32::from(self.recovery.base_port) + u32::from(self.recovery.max_attempts);
        if last > u32::from(u16::MAX) {
            return Err(ServerError::Config(format!(
                "recovery range ends past port 65535 (base {}, attempts {})",
                self.recovery.base_port, self.recovery.max_attempts
            )));
        }
        Ok(())
    }
}

/// Command-line flags. Anything given here wins over the config file.
#[derive(Debug, Parser)]
#[command(name = "webserv")]
#[command(about = "A simple secure HTTPS web server")]
#[command(version)]
pub struct Cli {
    /// Port to listen on [default: 4001]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// PEM certificate file [default: webServCert.crt]
    #[arg(short, long, value_name = "FILE")]
    pub cert: Option<PathBuf>,

    /// PEM private key file [default: webServ.key]
    #[arg(short, long, value_name = "FILE")]
    pub key: Option<PathBuf>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Directory to serve files from [default: .]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, value_name = "FILE", env = "WEBSERV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serve plain HTTP instead of TLS (local debugging only)
    #[arg(long)]
    pub plaintext: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<Config> {
        let mut cfg = Config::load(self.config.as_deref())?;
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(cert) = self.cert {
            cfg.tls.cert = cert;
        }
        if let Some(key) = self.key {
            cfg.tls.key = key;
        }
        if let Some(host) = self.host {
            cfg.host = host;
        }
        if let Some(root) = self.root {
            cfg.root = root;
        }
        if self.plaintext {
            cfg.tls.enabled = false;
        }
        Ok(cfg)
    }
}
