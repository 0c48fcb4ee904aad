use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Top-level server configuration.
///
/// Every field has a default, so an empty YAML document (or no file at all)
/// yields a working configuration serving the current directory on
/// `127.0.0.1:6789`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub listen_addr: String,
    /// Seconds a client may take to send its header block; `0` waits forever
    pub header_timeout_secs: u64,
    /// Upper bound on the buffered header block
    pub max_header_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory resolved resource paths are joined onto
    pub document_root: PathBuf,
    /// Resource served for a request target of `/`
    pub default_resource: PathBuf,
    /// Display name used to classify the default resource
    pub default_resource_name: String,
    /// Line-oriented `source->destination` redirect records
    pub redirects_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub moved_permanently: PathBuf,
    pub bad_request: PathBuf,
    pub not_found: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:6789".to_string(),
            header_timeout_secs: 30,
            max_header_bytes: 64 * 1024,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("."),
            default_resource: PathBuf::from("index.html"),
            default_resource_name: "index.html".to_string(),
            redirects_file: PathBuf::from("./movedfileslog/movedfiles.log"),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            moved_permanently: PathBuf::from("./errorfiles/MovedPermanently-301.html"),
            bad_request: PathBuf::from("./errorfiles/Error-400.html"),
            not_found: PathBuf::from("./errorfiles/Error-404.html"),
        }
    }
}

impl ServerConfig {
    /// Header read timeout, `None` when disabled.
    pub fn header_timeout(&self) -> Option<Duration> {
        (self.header_timeout_secs > 0).then(|| Duration::from_secs(self.header_timeout_secs))
    }
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// `STATIK_CONFIG` names an optional YAML file; `LISTEN` overrides the
    /// listen address.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("STATIK_CONFIG").map(PathBuf::from);
        let listen = std::env::var("LISTEN").ok();
        Self::load_from(path.as_deref(), listen)
    }

    pub fn load_from(path: Option<&Path>, listen: Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(listen_addr) = listen {
            cfg.server.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document outright
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
