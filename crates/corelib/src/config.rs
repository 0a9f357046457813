use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_READ_CHUNK_SIZE: usize = 64 * 1024;
pub const MIN_READ_CHUNK_SIZE: usize = 64;
pub const MAX_READ_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Tuning for reader-driven hashing. Never affects the multihash constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bytes pulled from a reader per streaming write.
    pub read_chunk_size: usize,
    /// Emit the multihash prefix (`false` writes the raw 32-byte digest).
    pub multihash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            multihash: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_READ_CHUNK_SIZE..=MAX_READ_CHUNK_SIZE).contains(&self.read_chunk_size) {
            return Err(anyhow!(
                "read_chunk_size {} out of allowed range [{}..{}]",
                self.read_chunk_size,
                MIN_READ_CHUNK_SIZE,
                MAX_READ_CHUNK_SIZE
            ));
        }
        Ok(())
    }

    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let s =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Config =
            toml::from_str(&s).with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// `load` when a path is given, built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
