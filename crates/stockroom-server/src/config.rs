use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Default name of the JSON document inside the cache directory.
pub const DEFAULT_STORE_FILE: &str = "inventory.json";

/// Default request body limit for photo uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Holds the store document and every uploaded photo.
    pub cache_dir: PathBuf,
    #[serde(default = "default_store_file")]
    pub store_file: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_store_file() -> String {
    DEFAULT_STORE_FILE.to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr,
            cache_dir: cache_dir.into(),
            store_file: default_store_file(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }

    /// Parse a TOML configuration document.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err(ServerError::Config("cache_dir must not be empty".into()));
        }
        let bare = Path::new(&self.store_file).file_name().map(|n| n == self.store_file.as_str());
        if self.store_file.is_empty() || bare != Some(true) {
            return Err(ServerError::Config(format!(
                "store_file must be a plain filename, got {:?}",
                self.store_file
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(ServerError::Config("max_upload_bytes must be positive".into()));
        }
        Ok(())
    }

    /// Location of the JSON store document.
    pub fn store_path(&self) -> PathBuf {
        self.cache_dir.join(&self.store_file)
    }
}
