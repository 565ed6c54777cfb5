//! Server configuration.
//!
//! Configuration is read from an optional YAML file and then patched with
//! environment overrides. Every field has a default, so an empty file (or no
//! file at all) yields a server that answers with the canned greeting on
//! `127.0.0.1:8080`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the YAML configuration file.
pub const CONFIG_ENV: &str = "SANDSTONE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticConfig,
    /// Body sent when no document root is configured.
    pub greeting: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on the request line plus headers, in bytes.
    pub max_request_bytes: usize,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    /// Spawn one task per connection instead of serving them one at a time.
    pub concurrent: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub document_root: Option<PathBuf>,
    /// Served in place of `/`.
    pub default_document: String,
    pub containment: ContainmentPolicy,
    /// Size of each read from a served file.
    pub chunk_size: usize,
}

/// How the resolver decides that a canonical path lies inside the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainmentPolicy {
    /// Compare whole path components: `/srv/web` contains `/srv/web/a` but
    /// not `/srv/webhook/a`.
    #[default]
    Segment,
    /// Literal string prefix comparison. Accepts sibling directories that
    /// share a name prefix with the root; kept only for compatibility.
    Prefix,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            static_files: StaticConfig::default(),
            greeting: "Hello, World!".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_request_bytes: 4096,
            read_timeout_ms: 5_000,
            write_timeout_ms: 10_000,
            concurrent: false,
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            document_root: None,
            default_document: "index.html".to_string(),
            containment: ContainmentPolicy::Segment,
            chunk_size: 8192,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl Config {
    /// Loads the file named by `SANDSTONE_CONFIG` (defaults when unset) and
    /// applies `LISTEN` / `DOCUMENT_ROOT` from the process environment.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let cfg: Self = serde_yaml::from_str(raw).context("failed to parse YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Applies environment-style overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("LISTEN") {
            self.server.listen_addr = addr;
        }

        if let Some(root) = lookup("DOCUMENT_ROOT") {
            self.static_files.document_root = Some(PathBuf::from(root));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_request_bytes == 0 {
            anyhow::bail!("server.max_request_bytes must be greater than zero");
        }

        if self.static_files.chunk_size == 0 {
            anyhow::bail!("static_files.chunk_size must be greater than zero");
        }

        Ok(())
    }
}
